//! Integration tests for video endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, VIDEO_SIZE, video_byte};

async fn app_with_video() -> (TestApp, String, String) {
    let app = TestApp::new().await;
    let folder = app.create_folder("Clips", None).await;
    let video = app.download_video(&folder, "intro").await;
    let id = video["id"].as_str().unwrap().to_string();
    (app, folder, id)
}

#[tokio::test]
async fn test_download_to_server_returns_video() {
    let app = TestApp::new().await;
    let folder = app.create_folder("Clips", None).await;

    let video = app.download_video(&folder, "intro").await;

    assert_eq!(video["video_name"], "intro");
    assert_eq!(video["folder_id"], folder.as_str());
    let real_path = video["real_path"].as_str().unwrap();
    assert!(real_path.ends_with("/intro.mp4"));
    assert!(app.data_dir.path().join("videos").join(real_path).is_file());
}

#[tokio::test]
async fn test_download_input_is_validated() {
    let app = TestApp::new().await;
    let folder = app.create_folder("Clips", None).await;

    for body in [
        json!({ "video_url": "not a url", "type": "general", "folder_id": folder }),
        json!({ "video_url": "https://a.example/x.mp4", "type": "vimeo", "folder_id": folder }),
        json!({ "video_url": "https://a.example/x.mp4", "type": "youtube", "quality": "4k", "folder_id": folder }),
    ] {
        let response = app
            .request("POST", "/videos/download-to-server", Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "VALIDATION");
    }
}

#[tokio::test]
async fn test_download_failures() {
    let app = TestApp::new().await;
    let folder = app.create_folder("Clips", None).await;

    let missing_folder = app
        .request(
            "POST",
            "/videos/download-to-server",
            Some(json!({
                "video_url": "https://a.example/x.mp4",
                "type": "general",
                "folder_id": "00000000-0000-0000-0000-000000000001",
            })),
        )
        .await;
    assert_eq!(missing_folder.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_folder.error_code(), "NOT_FOUND");

    let upstream = app
        .request(
            "POST",
            "/videos/download-to-server",
            Some(json!({
                "video_url": "https://unreachable.example/x.mp4",
                "type": "general",
                "folder_id": folder,
            })),
        )
        .await;
    assert_eq!(upstream.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(upstream.error_code(), "UPSTREAM_FAILURE");
}

#[tokio::test]
async fn test_stream_explicit_range() {
    let (app, _, id) = app_with_video().await;

    let response = app
        .request_with_headers(
            "GET",
            &format!("/videos/stream?id={id}"),
            None,
            &[("Range", "bytes=0-99")],
        )
        .await;

    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("content-range"), "bytes 0-99/1000");
    assert_eq!(response.header("content-length"), "100");
    assert_eq!(response.header("content-type"), "video/mp4");
    let expected: Vec<u8> = (0..100).map(video_byte).collect();
    assert_eq!(&response.bytes[..], expected.as_slice());
}

#[tokio::test]
async fn test_stream_open_range_serves_default_window() {
    let (app, _, id) = app_with_video().await;

    let response = app
        .request_with_headers(
            "GET",
            &format!("/videos/stream?id={id}"),
            None,
            &[("Range", "bytes=500-")],
        )
        .await;

    assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.header("content-range"), "bytes 500-549/1000");
    assert_eq!(response.bytes.len(), 50);
    assert_eq!(response.bytes[0], video_byte(500));

    let tail = app
        .request_with_headers(
            "GET",
            &format!("/videos/stream?id={id}"),
            None,
            &[("Range", "bytes=999-")],
        )
        .await;
    assert_eq!(tail.header("content-range"), "bytes 999-999/1000");
    assert_eq!(&tail.bytes[..], &[video_byte(999)]);
}

#[tokio::test]
async fn test_stream_rejects_unsatisfiable_ranges() {
    let (app, _, id) = app_with_video().await;
    let path = format!("/videos/stream?id={id}");

    for range in ["bytes=500-200", "bytes=1000-", "notbytes=0-10", "bytes=0-1000"] {
        let response = app
            .request_with_headers("GET", &path, None, &[("Range", range)])
            .await;
        assert_eq!(response.status, StatusCode::RANGE_NOT_SATISFIABLE, "{range}");
        assert_eq!(response.error_code(), "INVALID_RANGE_HEADER");
        assert_eq!(
            response.header("content-range"),
            format!("bytes */{VIDEO_SIZE}")
        );
    }

    let no_header = app.request("GET", &path, None).await;
    assert_eq!(no_header.status, StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn test_stream_unknown_video_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            "GET",
            "/videos/stream?id=00000000-0000-0000-0000-000000000001",
            None,
            &[("Range", "bytes=0-10")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "NOT_FOUND");

    let malformed = app.request("GET", "/videos/stream?id=abc", None).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_download_to_local_sends_attachment() {
    let (app, _, id) = app_with_video().await;

    let response = app
        .request("GET", &format!("/videos/download-to-local?id={id}"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"intro.mp4\""
    );
    assert_eq!(response.bytes.len(), VIDEO_SIZE);
}

#[tokio::test]
async fn test_rename_move_and_delete_video() {
    let (app, folder, id) = app_with_video().await;
    let other = app.create_folder("Other", None).await;

    let original = app
        .request("GET", &format!("/folders?folder_id={folder}"), None)
        .await
        .body["videos"][0]
        .clone();

    let renamed = app
        .request(
            "PUT",
            "/videos/rename",
            Some(json!({ "id": id, "video_name": "Opening credits" })),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["video_name"], "Opening credits");
    assert_eq!(renamed.body["real_path"], original["real_path"]);
    assert_eq!(renamed.body["preview_path"], original["preview_path"]);

    let to_missing = app
        .request(
            "PUT",
            "/videos/move",
            Some(json!({ "id": id, "folder_id": "00000000-0000-0000-0000-000000000001" })),
        )
        .await;
    assert_eq!(to_missing.error_code(), "NOT_FOUND");

    let moved = app
        .request(
            "PUT",
            "/videos/move",
            Some(json!({ "id": id, "folder_id": other })),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["folder_id"], other.as_str());
    assert_eq!(moved.body["real_path"], original["real_path"]);

    let deleted = app
        .request("DELETE", "/videos", Some(json!({ "id": id })))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listing = app
        .request("GET", &format!("/folders?folder_id={other}"), None)
        .await;
    assert!(listing.body["videos"].as_array().unwrap().is_empty());

    let again = app
        .request("DELETE", "/videos", Some(json!({ "id": id })))
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["storage"]["videos"], true);
    assert!(!response.header("x-request-id").is_empty());
}
