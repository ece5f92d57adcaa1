//! Video lifecycle: download, lookup, rename, move, delete, and range reads.

use std::sync::Arc;

use tracing::{error, info, warn};

use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::traits::media::{PreviewGenerator, VideoDownloader};
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::SourceKind;
use vidvault_core::types::{FolderId, VideoId};
use vidvault_database::store::{FolderStore, VideoStore};
use vidvault_entity::video::{CreateVideo, Video};

use super::range::{RangeWindow, UnsatisfiableRange, parse_range_header};
use crate::context::RequestContext;

/// An open media file ready to be streamed.
///
/// The handle is closed when the value is dropped.
#[derive(Debug)]
pub struct VideoFile {
    /// Display name of the video.
    pub name: String,
    /// File name of the media file on disk.
    pub file_name: String,
    pub file: tokio::fs::File,
    pub size: u64,
}

/// An open media file plus the byte window a client asked for.
#[derive(Debug)]
pub struct VideoRange {
    pub file: VideoFile,
    pub window: RangeWindow,
}

/// Download request accepted by [`VideoService::download_to_server`].
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: SourceKind,
    pub quality: String,
    pub folder_id: FolderId,
}

/// Manages video records and the files behind them.
#[derive(Debug, Clone)]
pub struct VideoService {
    videos: Arc<dyn VideoStore>,
    folders: Arc<dyn FolderStore>,
    storage: Arc<dyn StorageProvider>,
    downloader: Arc<dyn VideoDownloader>,
    previews: Arc<dyn PreviewGenerator>,
}

impl VideoService {
    /// Creates a new video service. `storage` is the video area.
    pub fn new(
        videos: Arc<dyn VideoStore>,
        folders: Arc<dyn FolderStore>,
        storage: Arc<dyn StorageProvider>,
        downloader: Arc<dyn VideoDownloader>,
        previews: Arc<dyn PreviewGenerator>,
    ) -> Self {
        Self {
            videos,
            folders,
            storage,
            downloader,
            previews,
        }
    }

    /// Download a video, generate its preview, and persist the record.
    ///
    /// The destination folder is checked before anything is fetched and again
    /// right before the insert. If the preview, the second check, or the
    /// insert fails, files produced so far are removed on a best-effort basis.
    pub async fn download_to_server(
        &self,
        ctx: &RequestContext,
        req: DownloadRequest,
    ) -> AppResult<Video> {
        self.require_folder(ctx, req.folder_id).await?;

        let downloaded = ctx
            .run(self.downloader.download(req.kind, &req.url, &req.quality))
            .await?;

        let preview_path = match ctx
            .run(
                self.previews
                    .create_preview(&downloaded.name, &downloaded.real_path),
            )
            .await
        {
            Ok(path) => path,
            Err(e) => {
                self.discard_file(&downloaded.real_path).await;
                return Err(e);
            }
        };

        let data = CreateVideo {
            name: downloaded.name,
            folder_id: req.folder_id,
            real_path: downloaded.real_path,
            preview_path,
        };
        // The folder may have been deleted while the download ran.
        let stored = match self.require_folder(ctx, data.folder_id).await {
            Ok(()) => ctx.run(self.videos.create(&data)).await,
            Err(e) => Err(e),
        };
        let video = match stored {
            Ok(video) => video,
            Err(e) => {
                self.discard_file(&data.real_path).await;
                if let Err(cleanup) = self
                    .previews
                    .delete_previews(std::slice::from_ref(&data.preview_path))
                    .await
                {
                    warn!(preview_path = %data.preview_path, error = %cleanup, "Failed to discard preview");
                }
                return Err(e);
            }
        };

        info!(
            request_id = %ctx.request_id,
            video_id = %video.id,
            folder_id = %video.folder_id,
            source = %req.kind,
            real_path = %video.real_path,
            "Video downloaded"
        );
        Ok(video)
    }

    /// Open the media file of a video.
    ///
    /// Fails with `NotFound` if the record or its file is missing.
    pub async fn get_video_file_info(
        &self,
        ctx: &RequestContext,
        id: VideoId,
    ) -> AppResult<VideoFile> {
        let video = self.require_video(ctx, id).await?;
        let opened = ctx
            .run(self.storage.open(&video.real_path))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::not_found(format!("Video file for {id} not found"))
                } else {
                    e
                }
            })?;

        let file_name = video
            .real_path
            .rsplit('/')
            .next()
            .unwrap_or(&video.real_path)
            .to_string();
        Ok(VideoFile {
            name: video.name,
            file_name,
            file: opened.file,
            size: opened.size,
        })
    }

    /// Open the media file and resolve `range_header` against its size.
    ///
    /// Header problems surface as `ErrorKind::RangeNotSatisfiable` with an
    /// [`UnsatisfiableRange`] source. The file handle is dropped before
    /// returning in that case.
    pub async fn get_video_range_info(
        &self,
        ctx: &RequestContext,
        id: VideoId,
        range_header: &str,
    ) -> AppResult<VideoRange> {
        let file = self.get_video_file_info(ctx, id).await?;
        let window = parse_range_header(range_header, file.size).map_err(|error| {
            warn!(video_id = %id, range = range_header, size = file.size, error = %error, "Unsatisfiable range");
            AppError::from(UnsatisfiableRange {
                error,
                file_size: file.size,
            })
        })?;
        Ok(VideoRange { file, window })
    }

    /// Change a video's display name. Paths stay untouched.
    pub async fn rename(&self, ctx: &RequestContext, id: VideoId, name: &str) -> AppResult<Video> {
        self.require_video(ctx, id).await?;
        let video = ctx.run(self.videos.rename(id, name)).await?;
        info!(request_id = %ctx.request_id, video_id = %id, name, "Video renamed");
        Ok(video)
    }

    /// Move a video to another existing folder. The file is not touched.
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        id: VideoId,
        folder_id: FolderId,
    ) -> AppResult<Video> {
        self.require_video(ctx, id).await?;
        self.require_folder(ctx, folder_id).await?;
        let video = ctx.run(self.videos.move_to(id, folder_id)).await?;
        info!(request_id = %ctx.request_id, video_id = %id, folder_id = %folder_id, "Video moved");
        Ok(video)
    }

    /// Delete a video: media file, then preview, then record.
    ///
    /// A file that is already gone is not an error, so a retried delete
    /// finishes the job. Any other filesystem error leaves the record in place.
    pub async fn delete(&self, ctx: &RequestContext, id: VideoId) -> AppResult<()> {
        let video = self.require_video(ctx, id).await?;

        if !ctx.run(self.storage.delete(&video.real_path)).await? {
            warn!(video_id = %id, real_path = %video.real_path, "Video file already missing");
        }
        ctx.run(
            self.previews
                .delete_previews(std::slice::from_ref(&video.preview_path)),
        )
        .await?;
        ctx.run(self.videos.delete(id)).await?;

        info!(request_id = %ctx.request_id, video_id = %id, "Video deleted");
        Ok(())
    }

    /// Delete every video in `folder_ids` together with their files.
    ///
    /// Records go first. File removal then continues past individual
    /// failures and reports them as one aggregate storage error.
    pub async fn delete_videos(
        &self,
        ctx: &RequestContext,
        folder_ids: &[FolderId],
    ) -> AppResult<u64> {
        if folder_ids.is_empty() {
            return Ok(0);
        }

        let paths = ctx.run(self.videos.paths_by_folders(folder_ids)).await?;
        let removed = ctx.run(self.videos.delete_by_folders(folder_ids)).await?;

        let mut failures = Vec::new();
        for path in &paths.real_paths {
            match ctx.run(self.storage.delete(path)).await {
                Ok(true) => {}
                Ok(false) => warn!(real_path = %path, "Video file already missing"),
                Err(e) => {
                    error!(real_path = %path, error = %e, "Failed to delete video file");
                    failures.push(path.clone());
                }
            }
        }
        if let Err(e) = ctx.run(self.previews.delete_previews(&paths.preview_paths)).await {
            error!(error = %e, "Failed to delete previews");
            failures.push(e.message);
        }

        info!(
            request_id = %ctx.request_id,
            folders = folder_ids.len(),
            videos = removed,
            failures = failures.len(),
            "Videos deleted"
        );

        if failures.is_empty() {
            Ok(removed)
        } else {
            Err(AppError::storage(format!(
                "Removed {removed} video record(s) but {} file cleanup(s) failed: {}",
                failures.len(),
                failures.join("; ")
            )))
        }
    }

    /// Videos directly inside `folder_id`.
    pub async fn get_videos(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Video>> {
        ctx.run(self.videos.list_by_folder(folder_id)).await
    }

    async fn require_video(&self, ctx: &RequestContext, id: VideoId) -> AppResult<Video> {
        ctx.run(self.videos.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))
    }

    async fn require_folder(&self, ctx: &RequestContext, id: FolderId) -> AppResult<()> {
        ctx.run(self.folders.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn discard_file(&self, real_path: &str) {
        if let Err(e) = self.storage.delete(real_path).await {
            warn!(real_path, error = %e, "Failed to discard downloaded file");
        }
    }
}
