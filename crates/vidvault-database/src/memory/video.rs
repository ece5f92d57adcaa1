//! In-memory video store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::types::{FolderId, VideoId};
use vidvault_entity::video::{CreateVideo, Video, VideoPaths};

use crate::store::VideoStore;

/// Video records keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryVideoStore {
    videos: Arc<RwLock<HashMap<VideoId, Video>>>,
}

impl MemoryVideoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: VideoId, apply: F) -> AppResult<Video>
    where
        F: FnOnce(&mut Video) + Send,
    {
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))?;
        apply(video);
        video.updated_at = Utc::now();
        Ok(video.clone())
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn create(&self, data: &CreateVideo) -> AppResult<Video> {
        let now = Utc::now();
        let video = Video {
            id: VideoId::new(),
            name: data.name.clone(),
            folder_id: data.folder_id,
            real_path: data.real_path.clone(),
            preview_path: data.preview_path.clone(),
            created_at: now,
            updated_at: now,
        };
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn find_by_id(&self, id: VideoId) -> AppResult<Option<Video>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn rename(&self, id: VideoId, name: &str) -> AppResult<Video> {
        let name = name.to_string();
        self.update(id, move |v| v.name = name).await
    }

    async fn move_to(&self, id: VideoId, folder_id: FolderId) -> AppResult<Video> {
        self.update(id, move |v| v.folder_id = folder_id).await
    }

    async fn delete(&self, id: VideoId) -> AppResult<bool> {
        Ok(self.videos.write().await.remove(&id).is_some())
    }

    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Video>> {
        let videos = self.videos.read().await;
        let mut listed: Vec<Video> = videos
            .values()
            .filter(|v| v.folder_id == folder_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(listed)
    }

    async fn paths_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<VideoPaths> {
        let videos = self.videos.read().await;
        let mut paths = VideoPaths::default();
        for video in videos.values().filter(|v| folder_ids.contains(&v.folder_id)) {
            paths.real_paths.push(video.real_path.clone());
            paths.preview_paths.push(video.preview_path.clone());
        }
        Ok(paths)
    }

    async fn delete_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<u64> {
        let mut videos = self.videos.write().await;
        let before = videos.len();
        videos.retain(|_, v| !folder_ids.contains(&v.folder_id));
        Ok((before - videos.len()) as u64)
    }
}
