use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoverageError {
    #[error("zone {zone_id} is degenerate: {reason}")]
    Degenerate { zone_id: String, reason: &'static str },
    #[error("zone {zone_id} produced non-finite coordinates")]
    NonFinite { zone_id: String },
    #[error("zone {zone_id} produced an empty ring")]
    EmptyRing { zone_id: String },
}
