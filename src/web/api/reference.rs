use axum::{
    extract::{Path, State},
    Json,
};

use super::{find, list};
use crate::reference::TargetFeature;
use crate::store::Collection;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::AppState;
use crate::zones::{CatseyeFeature, Zone};

#[utoipa::path(
    get,
    path = "/api/zones",
    responses((status = 200, description = "All zones", body = Vec<Zone>)),
    tag = "reference"
)]
pub async fn list_zones(State(state): State<AppState>) -> ApiResult<Json<Vec<Zone>>> {
    Ok(Json(list(&state, Collection::Zones)?))
}

#[utoipa::path(
    get,
    path = "/api/catseyes",
    responses((status = 200, description = "Coverage polygons of all zones", body = Vec<CatseyeFeature>)),
    tag = "reference"
)]
pub async fn list_catseyes(State(state): State<AppState>) -> ApiResult<Json<Vec<CatseyeFeature>>> {
    Ok(Json(list(&state, Collection::Catseyes)?))
}

#[utoipa::path(
    get,
    path = "/api/catseyes/{id}",
    params(("id" = String, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Coverage polygon", body = CatseyeFeature),
        (status = 404, description = "Unknown or degenerate zone", body = ErrorResponse)
    ),
    tag = "reference"
)]
pub async fn get_catseye(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CatseyeFeature>> {
    Ok(Json(find(&state, Collection::Catseyes, &id)?))
}

#[utoipa::path(
    get,
    path = "/api/targets",
    responses((status = 200, description = "Gateways and ground targets", body = Vec<TargetFeature>)),
    tag = "reference"
)]
pub async fn list_targets(State(state): State<AppState>) -> ApiResult<Json<Vec<TargetFeature>>> {
    Ok(Json(list(&state, Collection::Targets)?))
}
