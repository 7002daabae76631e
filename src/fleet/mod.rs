mod error;
mod live;
mod scheduler;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use live::compute_live_feature;
pub use scheduler::{
    FleetContext, FleetScheduler, PassReport, SchedulerConfig, SchedulerStatus, StatusHandle,
};
pub use types::{LiveSatelliteFeature, PointGeometry, SatelliteStaticState};
