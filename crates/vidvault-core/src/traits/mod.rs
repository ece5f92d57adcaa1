//! Core traits defined in `vidvault-core` and implemented by other crates.

pub mod media;
pub mod storage;

pub use media::{PreviewGenerator, VideoDownloader};
pub use storage::StorageProvider;
