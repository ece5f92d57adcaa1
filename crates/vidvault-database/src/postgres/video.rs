//! Video store backed by the `videos` table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_core::result::AppResult;
use vidvault_core::types::{FolderId, VideoId};
use vidvault_entity::video::{CreateVideo, Video, VideoPaths};

use crate::store::VideoStore;

const VIDEO_COLUMNS: &str =
    "id, name, folder_id, real_path, preview_path, created_at, updated_at";

/// Repository for video records.
#[derive(Debug, Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    /// Create a new video store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn folder_uuids(ids: &[FolderId]) -> Vec<Uuid> {
    ids.iter().map(|id| id.into_uuid()).collect()
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn create(&self, data: &CreateVideo) -> AppResult<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "INSERT INTO videos (name, folder_id, real_path, preview_path) \
             VALUES ($1, $2, $3, $4) RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.folder_id)
        .bind(&data.real_path)
        .bind(&data.preview_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create video", e))
    }

    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>> {
        sqlx::query_as::<_, Video>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to find video {id}"), e)
            })
    }

    async fn rename(&self, id: VideoId, name: &str) -> AppResult<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "UPDATE videos SET name = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename video", e))?
        .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))
    }

    async fn move_to(&self, id: VideoId, folder_id: FolderId) -> AppResult<Video> {
        sqlx::query_as::<_, Video>(&format!(
            "UPDATE videos SET folder_id = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move video", e))?
        .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))
    }

    async fn delete(&self, id: VideoId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete video", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Video>> {
        sqlx::query_as::<_, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE folder_id = $1 \
             ORDER BY created_at ASC, name ASC"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list videos", e))
    }

    async fn paths_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<VideoPaths> {
        if folder_ids.is_empty() {
            return Ok(VideoPaths::default());
        }

        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT real_path, preview_path FROM videos WHERE folder_id = ANY($1)",
        )
        .bind(folder_uuids(folder_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to collect video paths", e)
        })?;

        let (real_paths, preview_paths) = rows.into_iter().unzip();
        Ok(VideoPaths {
            real_paths,
            preview_paths,
        })
    }

    async fn delete_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<u64> {
        if folder_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM videos WHERE folder_id = ANY($1)")
            .bind(folder_uuids(folder_ids))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete videos", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
