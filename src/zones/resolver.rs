use crate::geometry::normalize_360;

use super::Zone;

/// Whether `lon_deg` falls strictly inside the zone's band.
///
/// Both the zone bounds and the longitude are taken into `[0, 360)`. A band
/// whose end lies before its start wraps the antimeridian.
pub fn zone_contains(zone: &Zone, lon_deg: f64) -> bool {
    let lon = normalize_360(lon_deg);
    let start = normalize_360(zone.start_lng);
    let mut end = normalize_360(zone.end_lng);

    if end < start {
        end += 360.0;
        let lon = if lon < start { lon + 360.0 } else { lon };
        start < lon && lon < end
    } else {
        start < lon && lon < end
    }
}

/// Maps a longitude to every zone whose band contains it.
#[derive(Debug, Clone, Default)]
pub struct ZoneResolver {
    zones: Vec<Zone>,
}

impl ZoneResolver {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Zone ids in loading order. Overlapping bands all match, and an empty
    /// result means no zone currently serves that longitude.
    pub fn resolve(&self, lon_deg: f64) -> Vec<String> {
        self.zones
            .iter()
            .filter(|zone| zone_contains(zone, lon_deg))
            .map(|zone| zone.zone_id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
