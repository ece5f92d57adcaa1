//! Download strategies selected by [`SourceKind`].

pub mod general;
pub mod youtube;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use vidvault_core::config::media::MediaConfig;
use vidvault_core::result::AppResult;
use vidvault_core::traits::media::VideoDownloader;
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::{DownloadedVideo, SourceKind};

pub use general::GeneralStrategy;
pub use youtube::YouTubeStrategy;

use crate::process::ProcessRunner;

/// One concrete way of fetching a video.
#[derive(Debug, Clone, Copy)]
pub enum DownloadStrategy<'a> {
    General(&'a GeneralStrategy),
    YouTube(&'a YouTubeStrategy),
}

impl DownloadStrategy<'_> {
    pub async fn download(&self, url: &str, quality: &str) -> AppResult<DownloadedVideo> {
        match self {
            Self::General(strategy) => strategy.download(url).await,
            Self::YouTube(strategy) => strategy.download(url, quality).await,
        }
    }
}

/// Holds one instance of every strategy and dispatches on the source kind.
#[derive(Debug, Clone)]
pub struct StrategyDownloader {
    general: GeneralStrategy,
    youtube: YouTubeStrategy,
}

impl StrategyDownloader {
    pub fn new(general: GeneralStrategy, youtube: YouTubeStrategy) -> Self {
        Self { general, youtube }
    }

    /// Build both strategies against the video storage area.
    pub fn from_config(videos: Arc<dyn StorageProvider>, config: &MediaConfig) -> AppResult<Self> {
        let general = GeneralStrategy::new(
            videos.clone(),
            Duration::from_secs(config.http_timeout_seconds),
            &config.user_agent,
        )?;
        let youtube = YouTubeStrategy::new(
            videos,
            ProcessRunner::new(Duration::from_secs(config.process_timeout_seconds)),
            &config.ytdlp_path,
            &config.ffmpeg_path,
        );
        Ok(Self::new(general, youtube))
    }

    pub fn strategy(&self, kind: SourceKind) -> DownloadStrategy<'_> {
        match kind {
            SourceKind::General => DownloadStrategy::General(&self.general),
            SourceKind::YouTube => DownloadStrategy::YouTube(&self.youtube),
        }
    }
}

#[async_trait]
impl VideoDownloader for StrategyDownloader {
    async fn download(
        &self,
        kind: SourceKind,
        url: &str,
        quality: &str,
    ) -> AppResult<DownloadedVideo> {
        info!(source = %kind, url, quality, "Starting download");
        self.strategy(kind).download(url, quality).await
    }
}
