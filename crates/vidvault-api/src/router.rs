//! Route definitions for the VidVault HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with every route and the request-logging middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(folder_routes())
        .merge(video_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder CRUD and listing
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::get_folder)
                .post(handlers::folder::create_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/rename", put(handlers::folder::rename_folder))
        .route("/folders/move", put(handlers::folder::move_folder))
}

/// Video download, streaming, and management
fn video_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/videos/download-to-server",
            post(handlers::video::download_to_server),
        )
        .route(
            "/videos/download-to-local",
            get(handlers::video::download_to_local),
        )
        .route("/videos/stream", get(handlers::video::stream_video))
        .route("/videos/rename", put(handlers::video::rename_video))
        .route("/videos/move", put(handlers::video::move_video))
        .route(
            "/videos",
            axum::routing::delete(handlers::video::delete_video),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
