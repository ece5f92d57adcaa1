//! Service fixtures: in-memory stores, a temp-dir video area, and stub
//! download and preview collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::traits::media::{PreviewGenerator, VideoDownloader};
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::FolderId;
use vidvault_core::types::media::{DownloadedVideo, SourceKind};
use vidvault_database::{FolderStore, Stores};
use vidvault_entity::folder::Folder;
use vidvault_entity::video::Video;
use vidvault_storage::providers::LocalStorageProvider;

use crate::context::RequestContext;
use crate::folder::FolderService;
use crate::video::{DownloadRequest, VideoService};

const DEFAULT_SIZE: u64 = 256;

/// Writes `size` patterned bytes named after the URL's last segment.
#[derive(Debug)]
pub(crate) struct FakeDownloader {
    storage: Arc<dyn StorageProvider>,
    folders: Arc<dyn FolderStore>,
    next_size: AtomicU64,
    calls: AtomicUsize,
    doomed_folder: Mutex<Option<FolderId>>,
}

impl FakeDownloader {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Remove the folder record while the next download is in flight.
    pub(crate) fn delete_folder_during_download(&self, id: FolderId) {
        *self.doomed_folder.lock().unwrap() = Some(id);
    }
}

#[async_trait]
impl VideoDownloader for FakeDownloader {
    async fn download(
        &self,
        _kind: SourceKind,
        url: &str,
        _quality: &str,
    ) -> AppResult<DownloadedVideo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = url
            .rsplit('/')
            .next()
            .and_then(|s| s.strip_suffix(".mp4"))
            .unwrap_or("video")
            .to_string();
        let size = self.next_size.swap(DEFAULT_SIZE, Ordering::SeqCst);

        let dir = self.storage.create_random_dir().await?;
        let real_path = format!("{dir}/{name}.mp4");
        let bytes: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(self.storage.absolute_path(&real_path)?, bytes).await?;

        let doomed = self.doomed_folder.lock().unwrap().take();
        if let Some(id) = doomed {
            self.folders.delete_many(&[id]).await?;
        }

        Ok(DownloadedVideo { name, real_path })
    }
}

/// Hands out preview paths without touching disk and records deletions.
#[derive(Debug, Default)]
pub(crate) struct FakePreviewGenerator {
    fail_next: AtomicBool,
    deleted: Mutex<Vec<String>>,
}

impl FakePreviewGenerator {
    /// Make the next create or delete call fail.
    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::external("ffmpeg exited with status 1"));
        }
        Ok(())
    }
}

#[async_trait]
impl PreviewGenerator for FakePreviewGenerator {
    async fn create_preview(&self, name: &str, _real_path: &str) -> AppResult<String> {
        self.check()?;
        Ok(format!("{:02x}/ff/{name}.jpg", name.len()))
    }

    async fn delete_previews(&self, paths: &[String]) -> AppResult<()> {
        self.check()?;
        self.deleted.lock().unwrap().extend_from_slice(paths);
        Ok(())
    }
}

pub(crate) struct Harness {
    pub folders: FolderService,
    pub videos: Arc<VideoService>,
    pub downloader: Arc<FakeDownloader>,
    pub previews: Arc<FakePreviewGenerator>,
    root: tempfile::TempDir,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(root.path()).await.unwrap());
        let stores = Stores::in_memory();

        let downloader = Arc::new(FakeDownloader {
            storage: storage.clone(),
            folders: stores.folders.clone(),
            next_size: AtomicU64::new(DEFAULT_SIZE),
            calls: AtomicUsize::new(0),
            doomed_folder: Mutex::new(None),
        });
        let previews = Arc::new(FakePreviewGenerator::default());

        let videos = Arc::new(VideoService::new(
            stores.videos.clone(),
            stores.folders.clone(),
            storage,
            downloader.clone(),
            previews.clone(),
        ));
        let folders = FolderService::new(stores.folders.clone(), videos.clone());

        Self {
            folders,
            videos,
            downloader,
            previews,
            root,
        }
    }

    pub(crate) fn ctx(&self) -> RequestContext {
        RequestContext::new(Duration::from_secs(30))
    }

    pub(crate) fn video_root(&self) -> &Path {
        self.root.path()
    }

    pub(crate) fn request(&self, folder_id: FolderId) -> DownloadRequest {
        self.request_named(folder_id, "clip")
    }

    fn request_named(&self, folder_id: FolderId, name: &str) -> DownloadRequest {
        DownloadRequest {
            url: format!("https://media.example.com/{name}.mp4"),
            kind: SourceKind::General,
            quality: String::new(),
            folder_id,
        }
    }

    pub(crate) async fn folder(&self, name: &str, parent_id: Option<FolderId>) -> Folder {
        self.folders.create(&self.ctx(), name, parent_id).await.unwrap()
    }

    pub(crate) async fn download(&self, folder_id: FolderId, name: &str) -> Video {
        self.videos
            .download_to_server(&self.ctx(), self.request_named(folder_id, name))
            .await
            .unwrap()
    }

    pub(crate) async fn download_with_size(&self, folder_id: FolderId, name: &str, size: u64) -> Video {
        self.downloader.next_size.store(size, Ordering::SeqCst);
        self.download(folder_id, name).await
    }

    /// Every regular file currently under the video root.
    pub(crate) fn downloaded_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.path().to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    files.push(path);
                }
            }
        }
        files
    }
}
