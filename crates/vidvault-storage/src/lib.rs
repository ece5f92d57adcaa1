//! # vidvault-storage
//!
//! Filesystem storage for downloaded videos and their previews. Each area
//! is served by its own [`providers::local::LocalStorageProvider`] and the
//! [`StorageManager`] hands out the right one.

pub mod manager;
pub mod providers;

pub use manager::{StorageArea, StorageManager};
