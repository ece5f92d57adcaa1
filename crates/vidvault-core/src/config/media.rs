//! External tool and download configuration.

use serde::{Deserialize, Serialize};

/// Settings for the download strategies and the preview generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to the `ffmpeg` binary.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,
    /// Path to the `ffprobe` binary.
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,
    /// Path to the `yt-dlp` binary.
    #[serde(default = "default_ytdlp")]
    pub ytdlp_path: String,
    /// Timeout for remote HTTP fetches, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Timeout for a single external process invocation, in seconds.
    #[serde(default = "default_process_timeout")]
    pub process_timeout_seconds: u64,
    /// Image extension used for previews.
    #[serde(default = "default_preview_format")]
    pub preview_format: String,
    /// `User-Agent` sent with remote fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            ytdlp_path: default_ytdlp(),
            http_timeout_seconds: default_http_timeout(),
            process_timeout_seconds: default_process_timeout(),
            preview_format: default_preview_format(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_ytdlp() -> String {
    "yt-dlp".to_string()
}

fn default_http_timeout() -> u64 {
    600
}

fn default_process_timeout() -> u64 {
    900
}

fn default_preview_format() -> String {
    "jpg".to_string()
}

fn default_user_agent() -> String {
    concat!("vidvault/", env!("CARGO_PKG_VERSION")).to_string()
}
