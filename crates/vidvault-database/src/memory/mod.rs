//! In-process stores kept behind `tokio::sync::RwLock`.
//!
//! Data lives only as long as the process. Used by the test suites and by
//! `database.provider = "memory"`.

pub mod folder;
pub mod video;

pub use folder::MemoryFolderStore;
pub use video::MemoryVideoStore;
