use crate::geometry::{
    coverage_central_angle, destination_point, normalize_180, normalize_360, rad_to_deg,
};

use super::{CatseyeFeature, CoverageError, Zone};

/// Altitude of the fleet's circular MEO orbit (km).
pub const FLEET_ALTITUDE_KM: f64 = 8062.0;
/// Minimum elevation at which a ground terminal is considered covered.
pub const MIN_ELEVATION_DEG: f64 = 10.0;
/// Boundary offsets are clamped to this fraction of the footprint radius.
const MAX_OFFSET_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Copy)]
pub struct CoverageModel {
    pub altitude_km: f64,
    pub min_elevation_deg: f64,
    pub bearing_step_deg: f64,
}

impl Default for CoverageModel {
    fn default() -> Self {
        Self {
            altitude_km: FLEET_ALTITUDE_KM,
            min_elevation_deg: MIN_ELEVATION_DEG,
            bearing_step_deg: 1.0,
        }
    }
}

/// Catseye for `zone` under the default fleet coverage model.
pub fn synthesize_coverage(zone: &Zone) -> Result<CatseyeFeature, CoverageError> {
    CoverageModel::default().synthesize(zone)
}

impl CoverageModel {
    /// Builds the lens-shaped coverage polygon of `zone`.
    ///
    /// A footprint circle is placed on the equator at each zone boundary. The
    /// start circle keeps its points east of the zone center and the end
    /// circle keeps its points west of it. The two arcs are joined start
    /// first and the ring is closed. Longitudes are continuous around the
    /// center, which is expressed in `[-180, 180)`.
    ///
    /// The ring is not guaranteed to be simple for unusual zone geometry.
    pub fn synthesize(&self, zone: &Zone) -> Result<CatseyeFeature, CoverageError> {
        let degenerate = |reason| CoverageError::Degenerate {
            zone_id: zone.zone_id.clone(),
            reason,
        };

        let west = normalize_360(zone.center_lng - zone.start_lng);
        let east = normalize_360(zone.end_lng - zone.center_lng);
        if west == 0.0 {
            return Err(degenerate("start equals center"));
        }
        if east == 0.0 {
            return Err(degenerate("end equals center"));
        }
        if normalize_360(zone.start_lng) == normalize_360(zone.end_lng) {
            return Err(degenerate("start equals end"));
        }

        let radius = coverage_central_angle(self.altitude_km, self.min_elevation_deg);
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CoverageError::NonFinite {
                zone_id: zone.zone_id.clone(),
            });
        }

        let max_offset = rad_to_deg(radius) * MAX_OFFSET_RATIO;
        let mut warnings = Vec::new();
        let west = clamp_offset(west, max_offset, "start", &mut warnings);
        let east = clamp_offset(east, max_offset, "end", &mut warnings);

        let center = normalize_180(zone.center_lng);
        let mut ring = self.arc(center - west, radius, |lon| lon > center);
        ring.extend(self.arc(center + east, radius, |lon| lon < center));

        if ring
            .iter()
            .any(|[lat, lon]| !lat.is_finite() || !lon.is_finite())
        {
            return Err(CoverageError::NonFinite {
                zone_id: zone.zone_id.clone(),
            });
        }
        let Some(first) = ring.first().copied() else {
            return Err(CoverageError::EmptyRing {
                zone_id: zone.zone_id.clone(),
            });
        };
        ring.push(first);

        Ok(CatseyeFeature::new(ring, zone.clone(), warnings))
    }

    fn arc(&self, lon_deg: f64, radius: f64, keep: impl Fn(f64) -> bool) -> Vec<[f64; 2]> {
        let steps = (360.0 / self.bearing_step_deg).round() as usize;
        (0..steps)
            .map(|i| destination_point(0.0, lon_deg, i as f64 * self.bearing_step_deg, radius))
            .filter(|&(_, lon)| keep(lon))
            .map(|(lat, lon)| [lat, lon])
            .collect()
    }
}

fn clamp_offset(offset: f64, max: f64, side: &str, warnings: &mut Vec<String>) -> f64 {
    if offset > max {
        warnings.push(format!(
            "{side} boundary is {offset:.2} deg from center, clamped to {max:.2} deg"
        ));
        max
    } else {
        offset
    }
}
