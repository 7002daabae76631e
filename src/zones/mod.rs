mod coverage;
mod error;
mod resolver;
mod types;

pub use coverage::synthesize_coverage;
pub use error::CoverageError;
pub use resolver::ZoneResolver;
pub use types::{CatseyeFeature, Zone};
