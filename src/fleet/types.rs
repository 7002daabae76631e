use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::missions::{Category, Mission, PlanSource};
use crate::propagation::OrbitalElements;

/// Load-time state of one satellite, stored in `FLEET`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteStaticState {
    #[serde(flatten)]
    pub elements: OrbitalElements,
    pub category: Option<Category>,
    pub plan_source: Option<PlanSource>,
    pub missions: Vec<Mission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }
}

/// Where a satellite is right now and which of its missions are active.
/// Stored in `SATPOS`, keyed by satellite id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveSatelliteFeature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "satelliteID")]
    pub satellite_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// km
    pub altitude: f64,
    /// km/s
    pub velocity: f64,
    pub geometry: PointGeometry,
    pub zones: Vec<String>,
    pub missions: Vec<Mission>,
}
