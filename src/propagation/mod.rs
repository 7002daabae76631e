mod error;
mod geodetic;
mod sgp4_model;
mod types;

pub use error::PropagationError;
pub use geodetic::eci_to_geodetic;
pub use sgp4_model::Sgp4Propagator;
pub use types::{EciState, GeodeticFix, OrbitalElements};

use chrono::{DateTime, Utc};

/// Orbit propagation capability used by the fleet scheduler.
///
/// Implementations must be pure functions of their inputs and report bad
/// element sets as errors rather than panicking.
pub trait Propagator: Send + Sync {
    /// Inertial state of the satellite at `at`, with the Greenwich sidereal
    /// angle (radians) for the same instant.
    fn propagate(
        &self,
        elements: &OrbitalElements,
        at: DateTime<Utc>,
    ) -> Result<(EciState, f64), PropagationError>;

    fn eci_to_geodetic(&self, state: &EciState, sidereal: f64) -> GeodeticFix {
        eci_to_geodetic(state, sidereal)
    }
}
