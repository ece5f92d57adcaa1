//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let folders = state.stores.folders.health_check().await.unwrap_or(false);
    let videos = state.stores.videos.health_check().await.unwrap_or(false);
    let storage: std::collections::BTreeMap<String, bool> = state
        .storage_manager
        .health_check_all()
        .await
        .into_iter()
        .map(|(area, healthy)| (area.to_string(), healthy))
        .collect();

    let database = folders && videos;
    let healthy = database && storage.values().all(|ok| *ok);
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            storage,
        }),
    )
}
