//! Video entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vidvault_core::types::{FolderId, VideoId};

/// A downloaded video and its generated preview.
///
/// `real_path` and `preview_path` are fixed at download time and are never
/// rewritten by rename or move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Video {
    /// Unique video identifier.
    pub id: VideoId,
    /// Display name.
    pub name: String,
    /// Owning folder.
    pub folder_id: FolderId,
    /// Media file path relative to the video root.
    pub real_path: String,
    /// Preview image path relative to the preview root.
    pub preview_path: String,
    /// When the video was stored.
    pub created_at: DateTime<Utc>,
    /// When the video was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

/// Data required to persist a freshly downloaded video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideo {
    pub name: String,
    pub folder_id: FolderId,
    pub real_path: String,
    pub preview_path: String,
}

/// On-disk paths of a batch of videos, collected before a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPaths {
    pub real_paths: Vec<String>,
    pub preview_paths: Vec<String>,
}

impl VideoPaths {
    /// Returns `true` if no paths were collected.
    pub fn is_empty(&self) -> bool {
        self.real_paths.is_empty() && self.preview_paths.is_empty()
    }
}
