//! # vidvault-service
//!
//! Business logic for VidVault. The folder service owns the hierarchy
//! rules and the cascading delete; the video service sequences downloads,
//! keeps files and records in step, and resolves byte ranges for streaming.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod folder;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use folder::FolderService;
pub use video::{
    DownloadRequest, RangeError, RangeWindow, UnsatisfiableRange, VideoFile, VideoRange,
    VideoService,
};
