use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-target RF configuration of one beam.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct Beam {
    /// Target id, unique within a mission.
    pub id: String,
    #[serde(rename = "epcList")]
    pub epc_list: String,
    #[serde(rename = "targetOBAntID")]
    pub target_ob_ant_id: String,
    #[serde(rename = "targetMaxPointingTime")]
    pub target_max_pointing_time: String,
    #[serde(rename = "campID")]
    pub camp_id: String,
    #[serde(rename = "campMode")]
    pub camp_mode: String,
    #[serde(rename = "campGain")]
    pub camp_gain: String,
    #[serde(rename = "ldlaID")]
    pub ldla_id: String,
    #[serde(rename = "ldlaMode")]
    pub ldla_mode: String,
    #[serde(rename = "ldlaFCAGain")]
    pub ldla_fca_gain: String,
    #[serde(rename = "ldlaGCAGain")]
    pub ldla_gca_gain: String,
    #[serde(rename = "ldlaSCAGain")]
    pub ldla_sca_gain: String,
}

/// A satellite's communication task, keyed by the zone it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mission {
    pub id: String,
    #[serde(rename = "missionConfig")]
    pub config: String,
    #[serde(rename = "gatewayTargetID")]
    pub gateway_target_id: String,
    #[serde(rename = "gatewayOBAntID")]
    pub gateway_ob_ant_id: String,
    #[serde(rename = "gatewayPointingMaxTime")]
    pub gateway_pointing_max_time: String,
    /// Ordered by beam id.
    pub beams: Vec<Beam>,
}
