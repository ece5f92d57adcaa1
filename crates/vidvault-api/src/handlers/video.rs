//! Video download, streaming, and management handlers.

use std::io::SeekFrom;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_service::{DownloadRequest, VideoRange};

use crate::dto::request::{
    DeleteVideoRequest, DownloadVideoRequest, MoveVideoRequest, RenameVideoRequest, VideoQuery,
};
use crate::dto::response::{MessageResponse, VideoResponse};
use crate::error::ApiError;
use crate::extractors::{RequestId, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// POST /videos/download-to-server
pub async fn download_to_server(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<DownloadVideoRequest>,
) -> Result<Json<VideoResponse>, ApiError> {
    let ctx = state.download_context(request_id);
    let video = state
        .video_service
        .download_to_server(
            &ctx,
            DownloadRequest {
                url: req.video_url,
                kind: req.kind,
                quality: req.quality,
                folder_id: req.folder_id,
            },
        )
        .await?;
    Ok(Json(video.into()))
}

/// GET /videos/download-to-local?id=...
///
/// Sends the whole file as an attachment.
pub async fn download_to_local(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedQuery(query): ValidatedQuery<VideoQuery>,
) -> Result<Response, ApiError> {
    let ctx = state.context(request_id);
    let video = state
        .video_service
        .get_video_file_info(&ctx, query.id)
        .await?;

    let file_name = video.file_name.replace('"', "");
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, video.size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from_stream(ReaderStream::new(video.file)))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}

/// GET /videos/stream?id=...
///
/// Serves the byte window selected by the `Range` header as 206 Partial
/// Content. A missing header is treated as an empty one and rejected.
pub async fn stream_video(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedQuery(query): ValidatedQuery<VideoQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = state.context(request_id);
    let range_header = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let VideoRange { file, window } = state
        .video_service
        .get_video_range_info(&ctx, query.id, range_header)
        .await?;

    let mut handle = file.file;
    handle
        .seek(SeekFrom::Start(window.start))
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to seek video {}", query.id),
                e,
            )
        })?;

    tracing::debug!(
        video_id = %query.id,
        range_start = window.start,
        range_end = window.end,
        size = file.size,
        "Streaming video range"
    );

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
        .header(header::CONTENT_RANGE, window.content_range(file.size))
        .header(header::CONTENT_LENGTH, window.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(ReaderStream::new(
            handle.take(window.len()),
        )))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}

/// PUT /videos/rename
pub async fn rename_video(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<RenameVideoRequest>,
) -> Result<Json<VideoResponse>, ApiError> {
    let ctx = state.context(request_id);
    let video = state
        .video_service
        .rename(&ctx, req.id, &req.video_name)
        .await?;
    Ok(Json(video.into()))
}

/// PUT /videos/move
pub async fn move_video(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<MoveVideoRequest>,
) -> Result<Json<VideoResponse>, ApiError> {
    let ctx = state.context(request_id);
    let video = state
        .video_service
        .move_to(&ctx, req.id, req.folder_id)
        .await?;
    Ok(Json(video.into()))
}

/// DELETE /videos
pub async fn delete_video(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(req): ValidatedJson<DeleteVideoRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ctx = state.context(request_id);
    state.video_service.delete(&ctx, req.id).await?;
    Ok(Json(MessageResponse::new("Video deleted")))
}
