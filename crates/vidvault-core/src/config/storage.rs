//! Media storage configuration.

use serde::{Deserialize, Serialize};

/// Local directories holding downloaded videos and generated previews.
///
/// Paths stored on video records are relative to these roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for downloaded media files.
    #[serde(default = "default_video_root")]
    pub video_root: String,
    /// Root directory for preview images.
    #[serde(default = "default_preview_root")]
    pub preview_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            video_root: default_video_root(),
            preview_root: default_preview_root(),
        }
    }
}

fn default_video_root() -> String {
    "./data/videos".to_string()
}

fn default_preview_root() -> String {
    "./data/previews".to_string()
}
