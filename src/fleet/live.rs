use chrono::{DateTime, Utc};

use crate::missions::MissionIndex;
use crate::propagation::{OrbitalElements, PropagationError, Propagator};
use crate::zones::ZoneResolver;

use super::{LiveSatelliteFeature, PointGeometry};

/// Propagates one satellite to `at` and resolves its active missions.
pub fn compute_live_feature(
    elements: &OrbitalElements,
    at: DateTime<Utc>,
    propagator: &dyn Propagator,
    zones: &ZoneResolver,
    missions: &MissionIndex,
) -> Result<LiveSatelliteFeature, PropagationError> {
    let (state, sidereal) = propagator.propagate(elements, at)?;
    let fix = propagator.eci_to_geodetic(&state, sidereal);
    if !fix.is_finite() {
        return Err(PropagationError::NonFinite(elements.satellite_id.clone()));
    }

    let zone_ids = zones.resolve(fix.longitude_deg);
    let active = missions.select_active_missions(&elements.satellite_id, &zone_ids);

    Ok(LiveSatelliteFeature {
        kind: "Feature".to_string(),
        satellite_id: elements.satellite_id.clone(),
        timestamp: at,
        latitude: fix.latitude_deg,
        longitude: fix.longitude_deg,
        altitude: fix.altitude_km,
        velocity: fix.velocity_km_s,
        geometry: PointGeometry::new(fix.longitude_deg, fix.latitude_deg),
        zones: zone_ids,
        missions: active,
    })
}
