//! Store traits consumed by the folder and video services.
//!
//! Existence checks and writes are separate calls, so a check-then-write
//! sequence in a service is not atomic. Both backends still reject a
//! duplicate `(parent_id, name)` pair on write with `ErrorKind::Conflict`.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;

use vidvault_core::result::AppResult;
use vidvault_core::types::{FolderId, VideoId};
use vidvault_entity::folder::{CreateFolder, Folder};
use vidvault_entity::video::{CreateVideo, Video, VideoPaths};

/// Persistence for folder records.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder and return it with its assigned id.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Find a folder by id.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Whether a folder with `name` exists directly under `parent_id`
    /// (`None` meaning the root level).
    async fn exists_by_name(&self, name: &str, parent_id: Option<FolderId>) -> AppResult<bool>;

    /// Set a folder's name. Fails with `NotFound` if the id is unknown.
    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder>;

    /// Set a folder's parent. Fails with `NotFound` if the id is unknown.
    async fn move_to(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder>;

    /// Direct children of `parent_id` (`None` lists root folders), ordered by name.
    async fn children_of(&self, parent_id: Option<FolderId>) -> AppResult<Vec<Folder>>;

    /// Delete every listed folder record and return how many were removed.
    async fn delete_many(&self, ids: &[FolderId]) -> AppResult<u64>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    /// `root` followed by every folder transitively parented under it.
    ///
    /// Walks the tree breadth first with an explicit worklist, so the result
    /// order is level by level and, within a level, by name.
    async fn descendant_ids(&self, root: FolderId) -> AppResult<Vec<FolderId>> {
        let mut collected = vec![root];
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for child in self.children_of(Some(current)).await? {
                if !seen.insert(child.id) {
                    continue;
                }
                collected.push(child.id);
                queue.push_back(child.id);
            }
        }

        Ok(collected)
    }
}

/// Persistence for video records.
#[async_trait]
pub trait VideoStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a video and return it with its assigned id.
    async fn create(&self, data: &CreateVideo) -> AppResult<Video>;

    /// Find a video by id.
    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>>;

    /// Set a video's display name. Fails with `NotFound` if the id is unknown.
    async fn rename(&self, id: VideoId, name: &str) -> AppResult<Video>;

    /// Set a video's folder. Fails with `NotFound` if the id is unknown.
    async fn move_to(&self, id: VideoId, folder_id: FolderId) -> AppResult<Video>;

    /// Delete a video record. Returns `false` if it did not exist.
    async fn delete(&self, id: VideoId) -> AppResult<bool>;

    /// Videos directly inside `folder_id`.
    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Video>>;

    /// Media and preview paths of every video inside any of `folder_ids`.
    async fn paths_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<VideoPaths>;

    /// Delete every video inside any of `folder_ids` and return the count.
    async fn delete_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<u64>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
