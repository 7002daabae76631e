use csv::StringRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::csv_rows::{cell, parse_float};
use crate::fleet::PointGeometry;

pub(crate) const TARGET_COLUMNS: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TargetProperties {
    #[serde(rename = "targetID")]
    pub target_id: String,
    #[serde(rename = "shortName")]
    pub short_name: String,
    pub altitude: String,
    #[serde(rename = "gatewayFlag")]
    pub gateway_flag: String,
    #[serde(rename = "ttcFlag")]
    pub ttc_flag: String,
    #[serde(rename = "minElTlmAOS")]
    pub min_el_tlm_aos: f64,
    #[serde(rename = "minElTlmLOS")]
    pub min_el_tlm_los: f64,
    #[serde(rename = "longName")]
    pub long_name: String,
    #[serde(rename = "fileCode")]
    pub file_code: String,
}

/// Ground target (gateway or user terminal) as a GeoJSON point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TargetFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: TargetProperties,
}

/// Builds a target from one row of the targets table.
///
/// Longitudes above 180 are shifted into the western hemisphere.
pub fn parse_target(record: &StringRecord) -> Result<TargetFeature, String> {
    let lat = parse_float(record, 2, "lat")?;
    let mut lon = parse_float(record, 3, "lon")?;
    if lon > 180.0 {
        lon -= 360.0;
    }

    let target_id = cell(record, 0);
    if target_id.is_empty() {
        return Err("empty targetID".to_string());
    }

    Ok(TargetFeature {
        kind: "Feature".to_string(),
        geometry: PointGeometry::new(lon, lat),
        properties: TargetProperties {
            target_id,
            short_name: cell(record, 1),
            altitude: cell(record, 4),
            gateway_flag: cell(record, 5),
            ttc_flag: cell(record, 6),
            min_el_tlm_aos: parse_float(record, 7, "minElTlmAOS")?,
            min_el_tlm_los: parse_float(record, 8, "minElTlmLOS")?,
            long_name: cell(record, 9),
            file_code: cell(record, 10),
        },
    })
}
