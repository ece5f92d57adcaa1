//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use vidvault_core::config::AppConfig;
use vidvault_core::result::AppResult;
use vidvault_database::Stores;
use vidvault_media::{FfmpegPreviewGenerator, ProcessRunner, StrategyDownloader};
use vidvault_service::{FolderService, RequestContext, VideoService};
use vidvault_storage::{StorageArea, StorageManager};

use crate::extractors::RequestId;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Folder and video record stores
    pub stores: Stores,
    /// Video and preview storage areas
    pub storage_manager: Arc<StorageManager>,
    /// Folder service
    pub folder_service: Arc<FolderService>,
    /// Video service
    pub video_service: Arc<VideoService>,
}

impl AppState {
    /// Wire stores, storage areas, media tools, and services from configuration.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let stores = Stores::from_config(&config.database).await?;
        let storage_manager = Arc::new(StorageManager::from_config(&config.storage).await?);

        let videos = storage_manager.get(StorageArea::Videos).await?;
        let previews = storage_manager.get(StorageArea::Previews).await?;

        let preview_generator = Arc::new(FfmpegPreviewGenerator::new(
            videos.clone(),
            previews,
            ProcessRunner::new(Duration::from_secs(config.media.process_timeout_seconds)),
            &config.media.ffmpeg_path,
            &config.media.ffprobe_path,
            &config.media.preview_format,
        ));
        let downloader = Arc::new(StrategyDownloader::from_config(
            videos.clone(),
            &config.media,
        )?);

        let video_service = Arc::new(VideoService::new(
            stores.videos.clone(),
            stores.folders.clone(),
            videos,
            downloader,
            preview_generator,
        ));
        let folder_service = Arc::new(FolderService::new(
            stores.folders.clone(),
            Arc::clone(&video_service),
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            storage_manager,
            folder_service,
            video_service,
        })
    }

    /// Context bounded by the regular request deadline.
    pub fn context(&self, request_id: RequestId) -> RequestContext {
        RequestContext::with_request_id(
            request_id.0,
            Duration::from_secs(self.config.server.request_timeout_seconds),
        )
    }

    /// Context for download-to-server, which waits on remote fetches and
    /// external tools.
    pub fn download_context(&self, request_id: RequestId) -> RequestContext {
        RequestContext::with_request_id(
            request_id.0,
            Duration::from_secs(self.config.server.download_timeout_seconds),
        )
    }
}
