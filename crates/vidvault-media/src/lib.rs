//! # vidvault-media
//!
//! Everything that talks to the outside world on behalf of the video
//! service: remote downloads (plain HTTP and YouTube through `yt-dlp`),
//! stream merging and frame extraction through `ffmpeg`/`ffprobe`.

pub mod preview;
pub mod process;
pub mod strategy;

pub use preview::FfmpegPreviewGenerator;
pub use process::ProcessRunner;
pub use strategy::{DownloadStrategy, StrategyDownloader};
