//! YouTube download strategy built on the `yt-dlp` and `ffmpeg` CLIs.
//!
//! The best matching video-only and audio-only streams are fetched into
//! temporary files, remuxed into one `.mp4`, and the temporaries removed.

use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

use vidvault_core::error::{AppError, ErrorKind};
use vidvault_core::result::AppResult;
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::{
    DownloadedVideo, MAX_VIDEO_NAME_CHARS, VIDEO_EXTENSION, sanitize_file_name, truncate_chars,
};

use crate::process::ProcessRunner;

const BEST_QUALITY: &str = "best";

/// Subset of `yt-dlp --dump-single-json` output this strategy reads.
#[derive(Debug, Clone, Deserialize)]
struct VideoInfo {
    title: String,
    #[serde(default)]
    formats: Vec<StreamFormat>,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    height: Option<u32>,
    vcodec: Option<String>,
    acodec: Option<String>,
}

impl StreamFormat {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|c| c != "none")
    }

    fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none")
    }

    /// Quality label such as `720p`, empty when the height is unknown.
    fn quality_label(&self) -> String {
        self.height.map(|h| format!("{h}p")).unwrap_or_default()
    }
}

/// Downloads YouTube videos at a requested quality label.
#[derive(Debug, Clone)]
pub struct YouTubeStrategy {
    videos: Arc<dyn StorageProvider>,
    runner: ProcessRunner,
    ytdlp: String,
    ffmpeg: String,
}

impl YouTubeStrategy {
    pub fn new(
        videos: Arc<dyn StorageProvider>,
        runner: ProcessRunner,
        ytdlp: impl Into<String>,
        ffmpeg: impl Into<String>,
    ) -> Self {
        Self {
            videos,
            runner,
            ytdlp: ytdlp.into(),
            ffmpeg: ffmpeg.into(),
        }
    }

    pub async fn download(&self, url: &str, quality: &str) -> AppResult<DownloadedVideo> {
        let video_id = extract_video_id(url)?;
        let info = self.fetch_info(url).await?;

        let title = match sanitize_file_name(&info.title) {
            t if t.is_empty() => video_id.clone(),
            t => t,
        };
        let video_format = select_video_format(&info.formats, quality)?;
        let audio_format = select_audio_format(&info.formats)?;
        let label = video_format.quality_label();
        let display_name = display_name(&title, &label);

        let dir = self.videos.create_random_dir().await?;
        let video_tmp = format!("{dir}/{video_id}.video.{}", video_format.ext);
        let audio_tmp = format!("{dir}/{video_id}.audio.{}", audio_format.ext);
        let real_path = format!("{dir}/{display_name}.{VIDEO_EXTENSION}");

        let result = self
            .fetch_and_merge(url, video_format, audio_format, &video_tmp, &audio_tmp, &real_path)
            .await;
        self.remove_temporaries(&[&video_tmp, &audio_tmp]).await;
        result?;

        info!(
            video_id = %video_id,
            quality = %label,
            real_path = %real_path,
            "Downloaded YouTube video"
        );
        Ok(DownloadedVideo {
            name: display_name,
            real_path,
        })
    }

    async fn fetch_info(&self, url: &str) -> AppResult<VideoInfo> {
        let output = self
            .runner
            .run(
                &self.ytdlp,
                ["--dump-single-json", "--no-playlist", "--no-warnings", url],
            )
            .await?;
        serde_json::from_slice(&output.stdout).map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to parse video metadata: {e}"),
                e,
            )
        })
    }

    async fn fetch_and_merge(
        &self,
        url: &str,
        video_format: &StreamFormat,
        audio_format: &StreamFormat,
        video_tmp: &str,
        audio_tmp: &str,
        real_path: &str,
    ) -> AppResult<()> {
        let video_abs = self.absolute(video_tmp)?;
        let audio_abs = self.absolute(audio_tmp)?;
        let merged_abs = self.absolute(real_path)?;

        for (format, target) in [(video_format, &video_abs), (audio_format, &audio_abs)] {
            self.runner
                .run(
                    &self.ytdlp,
                    [
                        "--no-playlist",
                        "--no-warnings",
                        "-f",
                        format.format_id.as_str(),
                        "-o",
                        target.as_str(),
                        url,
                    ],
                )
                .await?;
        }

        self.runner
            .run(
                &self.ffmpeg,
                [
                    "-y",
                    "-i",
                    video_abs.as_str(),
                    "-i",
                    audio_abs.as_str(),
                    "-c",
                    "copy",
                    merged_abs.as_str(),
                ],
            )
            .await?;
        Ok(())
    }

    fn absolute(&self, relative: &str) -> AppResult<String> {
        Ok(self
            .videos
            .absolute_path(relative)?
            .to_string_lossy()
            .into_owned())
    }

    /// Best effort: failures are logged and never returned.
    async fn remove_temporaries(&self, paths: &[&str]) {
        for path in paths {
            if let Err(e) = self.videos.delete(path).await {
                warn!(path = %path, error = %e, "Failed to remove temporary stream");
            }
        }
    }
}

/// Video id from a `watch?v=`, `youtu.be/` or `/shorts/` URL.
fn extract_video_id(url: &str) -> AppResult<String> {
    let parsed = Url::parse(url)
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid video URL", e))?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let id = if host.ends_with("youtu.be") {
        segments.first().map(|s| s.to_string())
    } else if segments.first() == Some(&"shorts") {
        segments.get(1).map(|s| s.to_string())
    } else {
        parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
    };

    id.filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation(format!("No video id found in {url}")))
}

/// Video-only stream whose label equals `quality`.
///
/// `best`, an empty quality, or a label with no matching stream all select
/// the tallest video-only stream.
fn select_video_format<'a>(formats: &'a [StreamFormat], quality: &str) -> AppResult<&'a StreamFormat> {
    let candidates: Vec<&StreamFormat> = formats
        .iter()
        .filter(|f| f.has_video() && !f.has_audio())
        .collect();

    let best = candidates
        .iter()
        .copied()
        .max_by_key(|f| f.height.unwrap_or(0))
        .ok_or_else(|| AppError::external("No video stream available"))?;

    if quality.is_empty() || quality == BEST_QUALITY {
        return Ok(best);
    }
    Ok(candidates
        .into_iter()
        .find(|f| f.quality_label() == quality)
        .unwrap_or(best))
}

/// Audio-only stream, preferring `m4a` so the merge stays a plain remux.
fn select_audio_format(formats: &[StreamFormat]) -> AppResult<&StreamFormat> {
    let mut audio = formats.iter().filter(|f| f.has_audio() && !f.has_video());
    let first = audio
        .clone()
        .next()
        .ok_or_else(|| AppError::external("No audio stream available"))?;
    Ok(audio.find(|f| f.ext == "m4a").unwrap_or(first))
}

/// `<title> <label>`, with the title shortened so the whole name fits the
/// display-name limit and the quality label is kept.
fn display_name(title: &str, label: &str) -> String {
    if label.is_empty() {
        return truncate_chars(title, MAX_VIDEO_NAME_CHARS);
    }
    let budget = MAX_VIDEO_NAME_CHARS.saturating_sub(label.chars().count() + 1);
    format!("{} {label}", truncate_chars(title, budget))
}
