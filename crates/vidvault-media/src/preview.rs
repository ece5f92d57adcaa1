//! Thumbnail extraction with `ffprobe` and `ffmpeg`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::traits::media::PreviewGenerator;
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::sanitize_file_name;

use crate::process::ProcessRunner;

/// Earliest point of the video a preview may be taken from.
const MIN_TIME_FRACTION: f64 = 0.1;
/// Width of the window, starting at [`MIN_TIME_FRACTION`], previews are taken from.
const TIME_FRACTION_SPAN: f64 = 0.8;

/// Generates previews by grabbing a single frame at a random timestamp.
#[derive(Debug, Clone)]
pub struct FfmpegPreviewGenerator {
    videos: Arc<dyn StorageProvider>,
    previews: Arc<dyn StorageProvider>,
    runner: ProcessRunner,
    ffmpeg: String,
    ffprobe: String,
    extension: String,
}

impl FfmpegPreviewGenerator {
    pub fn new(
        videos: Arc<dyn StorageProvider>,
        previews: Arc<dyn StorageProvider>,
        runner: ProcessRunner,
        ffmpeg: impl Into<String>,
        ffprobe: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            videos,
            previews,
            runner,
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            extension: extension.into(),
        }
    }

    async fn probe_duration(&self, video: &str) -> AppResult<f64> {
        let output = self
            .runner
            .run(
                &self.ffprobe,
                [
                    "-v",
                    "error",
                    "-show_entries",
                    "format=duration",
                    "-of",
                    "default=noprint_wrappers=1:nokey=1",
                    video,
                ],
            )
            .await?;
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `ffprobe`'s bare `format=duration` output into seconds.
fn parse_duration(raw: &str) -> AppResult<f64> {
    let trimmed = raw.trim();
    let seconds: f64 = trimmed
        .parse()
        .map_err(|_| AppError::external(format!("Unexpected ffprobe duration: '{trimmed}'")))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AppError::external(format!(
            "Unexpected ffprobe duration: '{trimmed}'"
        )));
    }
    Ok(seconds)
}

/// Whole-second timestamp at `fraction` (in `[0, 1)`) of the preview window.
fn preview_timestamp(duration_secs: f64, fraction: f64) -> u64 {
    let position = MIN_TIME_FRACTION + fraction * TIME_FRACTION_SPAN;
    (duration_secs * position) as u64
}

#[async_trait]
impl PreviewGenerator for FfmpegPreviewGenerator {
    async fn create_preview(&self, name: &str, real_path: &str) -> AppResult<String> {
        let video = self.videos.absolute_path(real_path)?;
        let video = video.to_string_lossy().into_owned();

        let file_name = match sanitize_file_name(name) {
            n if n.is_empty() => "preview".to_string(),
            n => n,
        };
        let dir = self.previews.create_random_dir().await?;
        let relative = format!("{dir}/{file_name}.{}", self.extension);
        let target = self.previews.absolute_path(&relative)?;

        let duration = self.probe_duration(&video).await?;
        let timestamp = preview_timestamp(duration, rand::random::<f64>());

        self.runner
            .run(
                &self.ffmpeg,
                [
                    "-y".to_string(),
                    "-i".to_string(),
                    video,
                    "-ss".to_string(),
                    timestamp.to_string(),
                    "-vframes".to_string(),
                    "1".to_string(),
                    target.to_string_lossy().into_owned(),
                ],
            )
            .await?;

        info!(preview_path = %relative, timestamp, "Generated preview");
        Ok(relative)
    }

    async fn delete_previews(&self, paths: &[String]) -> AppResult<()> {
        let mut failures = Vec::new();
        for path in paths {
            match self.previews.delete(path).await {
                Ok(true) => {}
                Ok(false) => warn!(preview_path = %path, "Preview already missing"),
                Err(e) => {
                    warn!(preview_path = %path, error = %e, "Failed to delete preview");
                    failures.push(path.as_str());
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Failed to delete {} preview(s): {}",
                failures.len(),
                failures.join(", ")
            )))
        }
    }
}
