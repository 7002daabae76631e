use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Two-line element set of one satellite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElements {
    pub satellite_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "tleLine1")]
    pub line1: String,
    #[serde(rename = "tleLine2")]
    pub line2: String,
}

/// Earth-centred inertial (TEME) state, km and km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EciState {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticFix {
    pub latitude_deg: f64,
    /// In `[-180, 180)`.
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub velocity_km_s: f64,
}

impl GeodeticFix {
    pub fn is_finite(&self) -> bool {
        self.latitude_deg.is_finite()
            && self.longitude_deg.is_finite()
            && self.altitude_km.is_finite()
            && self.velocity_km_s.is_finite()
    }
}
