use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A longitude band of responsibility served through one gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub subregion: String,
    pub zone_id: String,
    pub start_lng: f64,
    pub center_lng: f64,
    pub end_lng: f64,
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// Single ring of `[lat, lon]` pairs, first point repeated at the end.
    pub coordinates: Vec<[f64; 2]>,
}

impl PolygonGeometry {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates,
        }
    }
}

/// Ground-coverage polygon of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatseyeFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PolygonGeometry,
    pub properties: Zone,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CatseyeFeature {
    pub fn new(ring: Vec<[f64; 2]>, properties: Zone, warnings: Vec<String>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: PolygonGeometry::new(ring),
            properties,
            warnings,
        }
    }
}
