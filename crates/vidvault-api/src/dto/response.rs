//! Response DTOs.

use serde::{Deserialize, Serialize};

use vidvault_core::types::{FolderId, VideoId};
use vidvault_entity::folder::{Folder, FolderContent};
use vidvault_entity::video::Video;

/// Folder as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderResponse {
    pub id: FolderId,
    pub folder_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_dir_id: Option<FolderId>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            folder_name: folder.name,
            parent_dir_id: folder.parent_id,
        }
    }
}

/// Video as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: VideoId,
    pub video_name: String,
    pub folder_id: FolderId,
    pub real_path: String,
    pub preview_path: String,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            video_name: video.name,
            folder_id: video.folder_id,
            real_path: video.real_path,
            preview_path: video.preview_path,
        }
    }
}

/// One level of a folder: its child folders and its videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContentResponse {
    /// Listed folder, absent for the root level.
    pub id: Option<FolderId>,
    pub folders: Vec<FolderResponse>,
    pub videos: Vec<VideoResponse>,
}

impl From<FolderContent> for FolderContentResponse {
    fn from(content: FolderContent) -> Self {
        Self {
            id: content.id,
            folders: content.folders.into_iter().map(Into::into).collect(),
            videos: content.videos.into_iter().map(Into::into).collect(),
        }
    }
}

/// Acknowledgement for mutations that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency is reachable, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub database: bool,
    /// Reachability per storage area.
    pub storage: std::collections::BTreeMap<String, bool>,
}
