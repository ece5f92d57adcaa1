//! Application builder: wires router, middleware, and state into an Axum app.

use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use vidvault_core::config::app::CorsConfig;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> axum::Router {
    build_router(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}
