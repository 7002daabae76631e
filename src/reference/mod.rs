mod beamplan;
mod csv_rows;
mod discovery;
mod error;
mod loader;
mod targets;
mod tle;
mod zone_table;

pub use error::LoadError;
pub use loader::{load, ReferenceData};
pub use targets::TargetFeature;
