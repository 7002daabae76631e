use std::future::Future;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::fleet as fleet_handlers;
use super::api::reference as reference_handlers;
use super::api_doc::ApiDoc;
use super::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Fleet
        .route("/api/satellites", get(fleet_handlers::list_satellites))
        .route("/api/satellites/{id}", get(fleet_handlers::get_satellite))
        .route("/api/fleet/{id}", get(fleet_handlers::get_fleet_member))
        .route("/api/scheduler", get(fleet_handlers::scheduler_status))
        // Reference data
        .route("/api/zones", get(reference_handlers::list_zones))
        .route("/api/catseyes", get(reference_handlers::list_catseyes))
        .route("/api/catseyes/{id}", get(reference_handlers::get_catseye))
        .route("/api/targets", get(reference_handlers::list_targets))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    bind_addr: &str,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
