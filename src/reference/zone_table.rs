use csv::StringRecord;

use super::csv_rows::{cell, parse_float};
use crate::zones::Zone;

pub(crate) const ZONE_COLUMNS: usize = 6;

/// Builds a zone from one row of the zones table.
pub fn parse_zone(record: &StringRecord) -> Result<Zone, String> {
    let zone_id = cell(record, 1);
    if zone_id.is_empty() {
        return Err("empty zoneID".to_string());
    }

    Ok(Zone {
        subregion: cell(record, 0),
        zone_id,
        start_lng: parse_float(record, 2, "startLng")?,
        center_lng: parse_float(record, 3, "centerLng")?,
        end_lng: parse_float(record, 4, "endLng")?,
        gateway: cell(record, 5),
    })
}
