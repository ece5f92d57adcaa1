//! Folder store backed by the `folders` table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_core::result::AppResult;
use vidvault_core::types::FolderId;
use vidvault_entity::folder::{CreateFolder, Folder};

use crate::store::FolderStore;

const UNIQUE_NAME_CONSTRAINT: &str = "folders_parent_name_key";

/// Repository for folder records and tree queries.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: PgPool,
}

impl PgFolderStore {
    /// Create a new folder store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error, conflict: String, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(UNIQUE_NAME_CONSTRAINT) => {
            AppError::conflict(conflict)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, parent_id) VALUES ($1, $2) \
             RETURNING id, name, parent_id, created_at, updated_at",
        )
        .bind(&data.name)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Folder '{}' already exists", data.name),
                "Failed to create folder",
            )
        })
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT id, name, parent_id, created_at, updated_at FROM folders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Failed to find folder {id}"), e)
        })
    }

    async fn exists_by_name(&self, name: &str, parent_id: Option<FolderId>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM folders \
             WHERE name = $1 AND parent_id IS NOT DISTINCT FROM $2)",
        )
        .bind(name)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check folder name", e)
        })
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, parent_id, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Folder '{name}' already exists"),
                "Failed to rename folder",
            )
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn move_to(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, parent_id, created_at, updated_at",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("Destination already holds a folder with the same name as {id}"),
                "Failed to move folder",
            )
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn children_of(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT id, name, parent_id, created_at, updated_at FROM folders \
             WHERE parent_id IS NOT DISTINCT FROM $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn descendant_ids(&self, root: FolderId) -> AppResult<Vec<FolderId>> {
        let mut ids = sqlx::query_scalar::<_, FolderId>(
            "WITH RECURSIVE tree (id, name, depth, path) AS ( \
                 SELECT id, name, 0, ARRAY[id] FROM folders WHERE id = $1 \
                 UNION ALL \
                 SELECT f.id, f.name, t.depth + 1, t.path || f.id \
                 FROM folders f JOIN tree t ON f.parent_id = t.id \
                 WHERE NOT f.id = ANY(t.path) \
             ) \
             SELECT id FROM tree ORDER BY depth ASC, name ASC",
        )
        .bind(root)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to collect descendants of folder {root}"),
                e,
            )
        })?;

        if ids.is_empty() {
            ids.push(root);
        }
        Ok(ids)
    }

    async fn delete_many(&self, ids: &[FolderId]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();

        let result = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folders", e)
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
