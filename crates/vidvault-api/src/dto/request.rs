//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use vidvault_core::types::media::SourceKind;
use vidvault_core::types::{FolderId, VideoId};

/// Quality labels a download request may ask for.
pub const QUALITY_LABELS: [&str; 9] = [
    "2160p", "1440p", "1080p", "720p", "480p", "360p", "240p", "144p", "best",
];

/// ASCII letters, digits, underscores, whitespace, and dashes.
fn validate_folder_name(name: &str) -> Result<(), ValidationError> {
    let allowed =
        |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_ascii_whitespace();
    if name.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("folder_name")
            .with_message("may only contain letters, digits, '_', '-' and spaces".into()))
    }
}

fn validate_quality(quality: &str) -> Result<(), ValidationError> {
    if quality.is_empty() || QUALITY_LABELS.contains(&quality) {
        Ok(())
    } else {
        Err(ValidationError::new("quality").with_message("unsupported quality label".into()))
    }
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 20), custom(function = "validate_folder_name"))]
    pub folder_name: String,
    /// Parent folder, root level when absent.
    #[serde(default)]
    pub parent_dir_id: Option<FolderId>,
}

/// Rename folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFolderRequest {
    pub id: FolderId,
    #[validate(length(min = 1, max = 20), custom(function = "validate_folder_name"))]
    pub folder_name: String,
}

/// Move folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveFolderRequest {
    pub id: FolderId,
    /// New parent folder.
    pub parent_dir_id: FolderId,
}

/// Delete folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteFolderRequest {
    pub id: FolderId,
}

/// `GET /folders` query. Without `folder_id` the root level is listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FolderQuery {
    pub folder_id: Option<FolderId>,
}

/// Download-to-server request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DownloadVideoRequest {
    /// Absolute URL of the media or watch page.
    #[validate(url)]
    pub video_url: String,
    /// Which download strategy to use.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Quality label, only meaningful for YouTube.
    #[serde(default)]
    #[validate(custom(function = "validate_quality"))]
    pub quality: String,
    /// Destination folder.
    pub folder_id: FolderId,
}

/// Rename video request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameVideoRequest {
    pub id: VideoId,
    #[validate(length(min = 1, max = 100))]
    pub video_name: String,
}

/// Move video request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveVideoRequest {
    pub id: VideoId,
    /// Destination folder.
    pub folder_id: FolderId,
}

/// Delete video request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteVideoRequest {
    pub id: VideoId,
}

/// `?id=` query used by the stream and download-to-local endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VideoQuery {
    pub id: VideoId,
}
