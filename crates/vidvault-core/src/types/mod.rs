//! Core type definitions used across the VidVault workspace.

pub mod id;
pub mod media;

pub use id::*;
pub use media::{DownloadedVideo, SourceKind};
