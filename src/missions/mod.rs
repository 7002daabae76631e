mod classification;
mod grouping;
mod index;
mod types;

pub use classification::{Category, ClassificationError, FleetPlan, FleetPlanConfig, PlanSource};
pub use grouping::{group_missions, BeamPlanRow, MissionHeader};
pub use index::MissionIndex;
pub use types::{Beam, Mission};
