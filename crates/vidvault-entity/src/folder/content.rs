//! One-level listing of a folder.

use serde::{Deserialize, Serialize};

use vidvault_core::types::FolderId;

use super::model::Folder;
use crate::video::Video;

/// Direct child folders and videos of a folder.
///
/// `id` is `None` for the root listing, which never contains videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContent {
    pub id: Option<FolderId>,
    pub folders: Vec<Folder>,
    pub videos: Vec<Video>,
}
