//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vidvault_api::{AppState, build_app};
use vidvault_core::config::AppConfig;
use vidvault_core::error::AppError;
use vidvault_core::result::AppResult;
use vidvault_core::traits::media::{PreviewGenerator, VideoDownloader};
use vidvault_core::traits::storage::StorageProvider;
use vidvault_core::types::media::{DownloadedVideo, SourceKind};
use vidvault_database::Stores;
use vidvault_service::{FolderService, VideoService};
use vidvault_storage::{StorageArea, StorageManager};

/// Size of every file produced by [`StubDownloader`].
pub const VIDEO_SIZE: usize = 1000;

/// Byte at `offset` of every stub video.
pub fn video_byte(offset: usize) -> u8 {
    (offset % 251) as u8
}

/// Writes a fixed-size patterned file named after the URL's last segment.
///
/// URLs containing `unreachable` fail like an upstream error would.
#[derive(Debug)]
struct StubDownloader {
    videos: Arc<dyn StorageProvider>,
}

#[async_trait]
impl VideoDownloader for StubDownloader {
    async fn download(
        &self,
        _kind: SourceKind,
        url: &str,
        _quality: &str,
    ) -> AppResult<DownloadedVideo> {
        if url.contains("unreachable") {
            return Err(AppError::external(format!("Request to {url} failed")));
        }
        let name = url
            .rsplit('/')
            .next()
            .and_then(|s| s.strip_suffix(".mp4"))
            .unwrap_or("video")
            .to_string();

        let dir = self.videos.create_random_dir().await?;
        let real_path = format!("{dir}/{name}.mp4");
        let bytes: Vec<u8> = (0..VIDEO_SIZE).map(video_byte).collect();
        tokio::fs::write(self.videos.absolute_path(&real_path)?, bytes).await?;
        Ok(DownloadedVideo { name, real_path })
    }
}

/// Hands out preview paths without running ffmpeg.
#[derive(Debug)]
struct StubPreviews;

#[async_trait]
impl PreviewGenerator for StubPreviews {
    async fn create_preview(&self, name: &str, _real_path: &str) -> AppResult<String> {
        Ok(format!("aa/bb/{name}.jpg"))
    }

    async fn delete_previews(&self, _paths: &[String]) -> AppResult<()> {
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Holds the storage roots for the lifetime of the test
    pub data_dir: TempDir,
}

impl TestApp {
    /// Create a new test application on fresh in-memory stores
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.storage.video_root = data_dir.path().join("videos").display().to_string();
        config.storage.preview_root = data_dir.path().join("previews").display().to_string();

        let stores = Stores::in_memory();
        let storage_manager = Arc::new(
            StorageManager::from_config(&config.storage)
                .await
                .expect("Failed to init storage"),
        );
        let videos = storage_manager
            .get(StorageArea::Videos)
            .await
            .expect("Video area missing");

        let video_service = Arc::new(VideoService::new(
            stores.videos.clone(),
            stores.folders.clone(),
            videos.clone(),
            Arc::new(StubDownloader { videos }),
            Arc::new(StubPreviews),
        ));
        let folder_service = Arc::new(FolderService::new(
            stores.folders.clone(),
            Arc::clone(&video_service),
        ));

        let cors = config.server.cors.clone();
        let state = AppState {
            config: Arc::new(config),
            stores,
            storage_manager,
            folder_service,
            video_service,
        };

        Self {
            router: build_app(state, &cors),
            data_dir,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_with_headers(method, path, body, &[]).await
    }

    /// Make an HTTP request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/folders",
                Some(serde_json::json!({ "folder_name": name, "parent_dir_id": parent })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create folder failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Download a stub video into a folder and return its JSON
    pub async fn download_video(&self, folder_id: &str, name: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/videos/download-to-server",
                Some(serde_json::json!({
                    "video_url": format!("https://media.example.com/{name}.mp4"),
                    "type": "general",
                    "folder_id": folder_id,
                })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Download failed: {:?}",
            response.body
        );
        response.body
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` for non-JSON bodies
    pub body: Value,
    /// Raw body
    pub bytes: Bytes,
}

impl TestResponse {
    /// The `id` field of the JSON body
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("No id in response")
            .to_string()
    }

    /// The `error` code of a JSON error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// A response header as a string
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
