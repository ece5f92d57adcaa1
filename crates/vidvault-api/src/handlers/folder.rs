//! Folder CRUD and listing handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{
    CreateFolderRequest, DeleteFolderRequest, FolderQuery, MoveFolderRequest, RenameFolderRequest,
};
use crate::dto::response::{FolderContentResponse, FolderResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{RequestId, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// POST /folders
pub async fn create_folder(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
    let ctx = state.context(request_id);
    let folder = state
        .folder_service
        .create(&ctx, &req.folder_name, req.parent_dir_id)
        .await?;
    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// PUT /folders/rename
pub async fn rename_folder(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let ctx = state.context(request_id);
    let folder = state
        .folder_service
        .rename(&ctx, req.id, &req.folder_name)
        .await?;
    Ok(Json(folder.into()))
}

/// PUT /folders/move
pub async fn move_folder(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<MoveFolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let ctx = state.context(request_id);
    let folder = state
        .folder_service
        .move_folder(&ctx, req.id, req.parent_dir_id)
        .await?;
    Ok(Json(folder.into()))
}

/// DELETE /folders
pub async fn delete_folder(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<DeleteFolderRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ctx = state.context(request_id);
    state.folder_service.delete(&ctx, req.id).await?;
    Ok(Json(MessageResponse::new("Folder deleted")))
}

/// GET /folders?folder_id=...
pub async fn get_folder(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedQuery(query): ValidatedQuery<FolderQuery>,
) -> Result<Json<FolderContentResponse>, ApiError> {
    let ctx = state.context(request_id);
    let content = match query.folder_id {
        Some(id) => state.folder_service.get(&ctx, id).await?,
        None => state.folder_service.list_roots(&ctx).await?,
    };
    Ok(Json(content.into()))
}
