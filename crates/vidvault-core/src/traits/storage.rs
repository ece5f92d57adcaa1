//! Storage provider trait for the video and preview areas.

use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// An open file together with its size at the time it was opened.
///
/// Dropping the value closes the handle.
#[derive(Debug)]
pub struct OpenedFile {
    /// Read handle positioned at the start of the file.
    pub file: tokio::fs::File,
    /// File size in bytes.
    pub size: u64,
}

/// A byte stream type used for writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for file storage backends.
///
/// All paths are relative to the provider root.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a file for reading. Fails with `NotFound` if it does not exist.
    async fn open(&self, path: &str) -> AppResult<OpenedFile>;

    /// Write a byte stream to a file at the given path.
    async fn write_stream(&self, path: &str, stream: ByteStream) -> AppResult<u64>;

    /// Delete a file. Returns `false` when there was nothing to delete.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;

    /// Create a fresh, randomly named two-level directory (`ab/cd`) and
    /// return its relative path.
    async fn create_random_dir(&self) -> AppResult<String>;

    /// Resolve a relative path to an absolute location for external tools.
    fn absolute_path(&self, path: &str) -> AppResult<PathBuf>;
}
