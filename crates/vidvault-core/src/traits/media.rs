//! Download and preview collaborators used by the video service.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::media::{DownloadedVideo, SourceKind};

/// Fetches remote media into the video storage area.
#[async_trait]
pub trait VideoDownloader: Send + Sync + std::fmt::Debug + 'static {
    /// Download `url` using the strategy selected by `kind`.
    ///
    /// `quality` is a label such as `720p` or `best`; strategies that have no
    /// notion of quality ignore it. The returned path is relative to the
    /// video root.
    async fn download(&self, kind: SourceKind, url: &str, quality: &str)
    -> AppResult<DownloadedVideo>;
}

/// Produces and removes thumbnail images for stored videos.
#[async_trait]
pub trait PreviewGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Extract a still frame from the video at `real_path` and return the
    /// preview path relative to the preview root.
    async fn create_preview(&self, name: &str, real_path: &str) -> AppResult<String>;

    /// Remove the given previews. Missing files are ignored.
    async fn delete_previews(&self, paths: &[String]) -> AppResult<()>;
}
