use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Panel catalog routes
        .route("/api/panels", get(handlers::panels::list_panels))
        .route("/api/panels/rooms", get(handlers::panels::list_rooms))
        .route("/api/panels/racks", get(handlers::panels::list_racks))
        .route("/api/panels/import", post(handlers::panels::import_panels))
        .route("/api/panels/sync-status", get(handlers::panels::sync_status))
        .route("/api/panels/:dcim_id", get(handlers::panels::get_panel))
        .route("/api/panels/:dcim_id", put(handlers::panels::update_panel))
        // Route search
        .route("/api/routes", post(handlers::routes::find_routes))
        .route("/api/routes/report", post(handlers::routes::route_report))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
