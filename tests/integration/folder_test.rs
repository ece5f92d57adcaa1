//! Integration tests for folder endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_and_list_root_folders() {
    let app = TestApp::new().await;
    app.create_folder("Series", None).await;
    app.create_folder("Movies", None).await;

    let response = app.request("GET", "/folders", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.body["folders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["folder_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Movies", "Series"]);
    assert!(response.body["id"].is_null());
    assert!(response.body["folders"][0].get("parent_dir_id").is_none());
}

#[tokio::test]
async fn test_duplicate_folder_is_bad_request() {
    let app = TestApp::new().await;
    let movies = app.create_folder("Movies", None).await;
    app.create_folder("Action", Some(&movies)).await;

    let response = app
        .request(
            "POST",
            "/folders",
            Some(json!({ "folder_name": "Action", "parent_dir_id": movies })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_invalid_folder_input_is_rejected() {
    let app = TestApp::new().await;

    for body in [
        json!({ "folder_name": "" }),
        json!({ "folder_name": "this name is far too long" }),
        json!({ "folder_name": "bad/name" }),
        json!({ "folder_name": "ok", "parent_dir_id": "not-a-uuid" }),
        json!({ "name": "Movies" }),
    ] {
        let response = app.request("POST", "/folders", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "VALIDATION");
    }
}

#[tokio::test]
async fn test_unknown_folder_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/folders?folder_id=00000000-0000-0000-0000-000000000001",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_rename_and_move_folder() {
    let app = TestApp::new().await;
    let movies = app.create_folder("Movies", None).await;
    let archive = app.create_folder("Archive", None).await;
    let action = app.create_folder("Action", Some(&movies)).await;

    let response = app
        .request(
            "PUT",
            "/folders/rename",
            Some(json!({ "id": action, "folder_name": "Thriller" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], action.as_str());
    assert_eq!(response.body["folder_name"], "Thriller");
    assert_eq!(response.body["parent_dir_id"], movies.as_str());

    let response = app
        .request(
            "PUT",
            "/folders/move",
            Some(json!({ "id": action, "parent_dir_id": archive })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["parent_dir_id"], archive.as_str());

    let listing = app
        .request("GET", &format!("/folders?folder_id={archive}"), None)
        .await;
    assert_eq!(listing.body["folders"][0]["folder_name"], "Thriller");
}

#[tokio::test]
async fn test_move_into_descendant_is_rejected() {
    let app = TestApp::new().await;
    let movies = app.create_folder("Movies", None).await;
    let action = app.create_folder("Action", Some(&movies)).await;

    let response = app
        .request(
            "PUT",
            "/folders/move",
            Some(json!({ "id": movies, "parent_dir_id": action })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "CYCLIC_MOVE");
}

#[tokio::test]
async fn test_library_lifecycle() {
    let app = TestApp::new().await;
    let movies = app.create_folder("Movies", None).await;
    let action = app.create_folder("Action", Some(&movies)).await;

    let duplicate = app
        .request(
            "POST",
            "/folders",
            Some(json!({ "folder_name": "Action", "parent_dir_id": movies })),
        )
        .await;
    assert_eq!(duplicate.error_code(), "ALREADY_EXISTS");

    let video = app.download_video(&action, "trailer").await;
    let video_id = video["id"].as_str().unwrap().to_string();

    let content = app
        .request("GET", &format!("/folders?folder_id={action}"), None)
        .await;
    assert_eq!(content.status, StatusCode::OK);
    let videos = content.body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert!(!videos[0]["real_path"].as_str().unwrap().is_empty());
    assert!(!videos[0]["preview_path"].as_str().unwrap().is_empty());

    let deleted = app
        .request("DELETE", "/folders", Some(json!({ "id": movies })))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/folders?folder_id={action}"), None)
        .await;
    assert_eq!(gone.error_code(), "NOT_FOUND");

    let file = app
        .request("GET", &format!("/videos/download-to-local?id={video_id}"), None)
        .await;
    assert_eq!(file.status, StatusCode::BAD_REQUEST);
    assert_eq!(file.error_code(), "NOT_FOUND");

    let again = app
        .request("DELETE", "/folders", Some(json!({ "id": movies })))
        .await;
    assert_eq!(again.error_code(), "NOT_FOUND");
}
