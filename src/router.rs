use axum::{
    routing::{get, post},
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
        // Cluster routes
        .route("/api/clusters", get(handlers::clusters::list_clusters))
        .route("/api/clusters/filter", post(handlers::clusters::filter_clusters))
        .route("/api/registry/refresh", post(handlers::clusters::refresh_registry))
        // Session routes
        .route("/api/sessions", post(handlers::sessions::start_session))
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
