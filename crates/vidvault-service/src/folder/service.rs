//! Folder hierarchy: create, rename, move, cascading delete, and listing.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info};

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::types::FolderId;
use vidvault_database::store::FolderStore;
use vidvault_entity::folder::{CreateFolder, Folder, FolderContent};

use crate::context::RequestContext;
use crate::video::VideoService;

/// Enforces sibling-name uniqueness and tree shape for folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    video_service: Arc<VideoService>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderStore>, video_service: Arc<VideoService>) -> Self {
        Self {
            folders,
            video_service,
        }
    }

    /// Create a folder under `parent_id`, or at the root level when `None`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        if let Some(parent_id) = parent_id {
            self.require(ctx, parent_id).await?;
        }
        self.ensure_name_free(ctx, name, parent_id).await?;

        let folder = ctx
            .run(self.folders.create(&CreateFolder {
                name: name.to_string(),
                parent_id,
            }))
            .await?;

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Rename a folder, keeping its parent.
    pub async fn rename(&self, ctx: &RequestContext, id: FolderId, name: &str) -> AppResult<Folder> {
        let folder = self.require(ctx, id).await?;
        if folder.name == name {
            return Ok(folder);
        }
        self.ensure_name_free(ctx, name, folder.parent_id).await?;

        let folder = ctx.run(self.folders.rename(id, name)).await?;
        info!(request_id = %ctx.request_id, folder_id = %id, name, "Folder renamed");
        Ok(folder)
    }

    /// Reparent a folder under `new_parent_id`.
    ///
    /// Moving a folder into itself or any of its descendants fails with
    /// `CyclicMove`.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        new_parent_id: FolderId,
    ) -> AppResult<Folder> {
        self.require(ctx, new_parent_id).await?;
        let folder = self.require(ctx, id).await?;

        if self.is_within(ctx, new_parent_id, id).await? {
            return Err(AppError::cyclic_move(format!(
                "Cannot move folder {id} into its own subtree"
            )));
        }
        if folder.parent_id == Some(new_parent_id) {
            return Ok(folder);
        }
        self.ensure_name_free(ctx, &folder.name, Some(new_parent_id))
            .await?;

        let folder = ctx.run(self.folders.move_to(id, new_parent_id)).await?;
        info!(
            request_id = %ctx.request_id,
            folder_id = %id,
            parent_id = %new_parent_id,
            "Folder moved"
        );
        Ok(folder)
    }

    /// Delete a folder, every folder below it, and all their videos.
    ///
    /// Folder records go first. If the video cleanup then fails, the videos
    /// of the already removed folders are left behind and the error is
    /// returned.
    pub async fn delete(&self, ctx: &RequestContext, id: FolderId) -> AppResult<()> {
        self.require(ctx, id).await?;

        let ids = ctx.run(self.folders.descendant_ids(id)).await?;
        let removed = ctx.run(self.folders.delete_many(&ids)).await?;

        let videos = match self.video_service.delete_videos(ctx, &ids).await {
            Ok(count) => count,
            Err(e) => {
                error!(
                    request_id = %ctx.request_id,
                    folder_id = %id,
                    folder_ids = ?ids,
                    error = %e,
                    "Folders deleted but their videos were not fully cleaned up"
                );
                return Err(e);
            }
        };

        info!(
            request_id = %ctx.request_id,
            folder_id = %id,
            folders = removed,
            videos,
            "Folder deleted"
        );
        Ok(())
    }

    /// Direct child folders and videos of `id`.
    pub async fn get(&self, ctx: &RequestContext, id: FolderId) -> AppResult<FolderContent> {
        self.require(ctx, id).await?;
        let folders = ctx.run(self.folders.children_of(Some(id))).await?;
        let videos = self.video_service.get_videos(ctx, id).await?;
        Ok(FolderContent {
            id: Some(id),
            folders,
            videos,
        })
    }

    /// Root-level folders.
    pub async fn list_roots(&self, ctx: &RequestContext) -> AppResult<FolderContent> {
        let folders = ctx.run(self.folders.children_of(None)).await?;
        Ok(FolderContent {
            id: None,
            folders,
            videos: Vec::new(),
        })
    }

    async fn require(&self, ctx: &RequestContext, id: FolderId) -> AppResult<Folder> {
        ctx.run(self.folders.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn ensure_name_free(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<()> {
        if ctx.run(self.folders.exists_by_name(name, parent_id)).await? {
            return Err(AppError::conflict(format!("Folder '{name}' already exists")));
        }
        Ok(())
    }

    /// Whether `folder` is `ancestor` or lies somewhere below it.
    async fn is_within(
        &self,
        ctx: &RequestContext,
        folder: FolderId,
        ancestor: FolderId,
    ) -> AppResult<bool> {
        let mut visited = HashSet::new();
        let mut current = Some(folder);

        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            if !visited.insert(id) {
                break;
            }
            current = ctx
                .run(self.folders.find_by_id(id))
                .await?
                .and_then(|f| f.parent_id);
        }
        Ok(false)
    }
}
