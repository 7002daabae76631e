use axum::{
    extract::{Path, State},
    Json,
};

use super::{find, list};
use crate::fleet::{LiveSatelliteFeature, SatelliteStaticState, SchedulerStatus};
use crate::store::Collection;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::AppState;

#[utoipa::path(
    get,
    path = "/api/satellites",
    responses(
        (status = 200, description = "Latest position of every satellite", body = Vec<LiveSatelliteFeature>)
    ),
    tag = "fleet"
)]
pub async fn list_satellites(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LiveSatelliteFeature>>> {
    Ok(Json(list(&state, Collection::SatPos)?))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}",
    params(("id" = String, Path, description = "Satellite id")),
    responses(
        (status = 200, description = "Latest position", body = LiveSatelliteFeature),
        (status = 404, description = "Never published", body = ErrorResponse)
    ),
    tag = "fleet"
)]
pub async fn get_satellite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LiveSatelliteFeature>> {
    Ok(Json(find(&state, Collection::SatPos, &id)?))
}

#[utoipa::path(
    get,
    path = "/api/fleet/{id}",
    params(("id" = String, Path, description = "Satellite id")),
    responses(
        (status = 200, description = "Elements, category and missions", body = SatelliteStaticState),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "fleet"
)]
pub async fn get_fleet_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SatelliteStaticState>> {
    Ok(Json(find(&state, Collection::Fleet, &id)?))
}

#[utoipa::path(
    get,
    path = "/api/scheduler",
    responses(
        (status = 200, description = "Scheduler mode and last pass", body = SchedulerStatus)
    ),
    tag = "fleet"
)]
pub async fn scheduler_status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}
