//! Folder hierarchy service.

pub mod service;

pub use service::FolderService;
