//! Plain HTTP download strategy.

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use reqwest::{StatusCode, Url};
use tracing::{info, warn};

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_core::result::AppResult;
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::{
    DownloadedVideo, MAX_VIDEO_NAME_CHARS, VIDEO_EXTENSION, sanitize_file_name, truncate_chars,
};

/// Streams the body of a GET request straight into the video area.
#[derive(Debug, Clone)]
pub struct GeneralStrategy {
    client: reqwest::Client,
    videos: Arc<dyn StorageProvider>,
}

impl GeneralStrategy {
    /// Build a strategy whose requests give up after `timeout`.
    pub fn new(
        videos: Arc<dyn StorageProvider>,
        timeout: Duration,
        user_agent: &str,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self { client, videos })
    }

    pub async fn download(&self, url: &str) -> AppResult<DownloadedVideo> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid video URL", e))?;
        let file_name = file_name_from_url(&parsed);

        let response = self.client.get(parsed).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Request to {url} failed: {e}"),
                e,
            )
        })?;
        if response.status() != StatusCode::OK {
            return Err(AppError::external(format!(
                "Downloading {url} returned status {}",
                response.status()
            )));
        }

        let dir = self.videos.create_random_dir().await?;
        let real_path = format!("{dir}/{file_name}");
        let body = response.bytes_stream().map_err(std::io::Error::other);

        let written = match self.videos.write_stream(&real_path, Box::pin(body)).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = self.videos.delete(&real_path).await {
                    warn!(real_path = %real_path, error = %cleanup, "Failed to remove partial download");
                }
                return Err(e);
            }
        };

        info!(url, real_path = %real_path, bytes = written, "Downloaded video");
        Ok(DownloadedVideo {
            name: display_name(&file_name),
            real_path,
        })
    }
}

/// Last path segment of the URL with unsafe characters removed.
///
/// Falls back to `video.mp4` and appends the default extension when the
/// segment has none.
fn file_name_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or_default();
    let name = sanitize_file_name(segment);

    if name.is_empty() {
        format!("video.{VIDEO_EXTENSION}")
    } else if name.contains('.') {
        name
    } else {
        format!("{name}.{VIDEO_EXTENSION}")
    }
}

fn display_name(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    truncate_chars(stem, MAX_VIDEO_NAME_CHARS)
}
