//! Integration tests for the HTTP API surface.
//!
//! Run with: cargo test --test web_api_test
//!
//! Only paths that never reach the yt-dlp binary are exercised here:
//! input validation, the health check, and the file relay contract.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tuberelay::web::{router, WebState};

fn test_router(root: &std::path::Path) -> axum::Router {
    router(WebState::new(root.to_path_buf()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_ok() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

// ============================================================================
// Input validation (info / formats)
// ============================================================================

#[tokio::test]
async fn test_info_requires_url_param() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(Request::builder().uri("/youtube/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL parameter is required");
}

#[tokio::test]
async fn test_info_rejects_invalid_url() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/youtube/info?url=https://evil.com/watch?v=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid URL");
}

#[tokio::test]
async fn test_info_rejects_empty_url() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/youtube/info?url=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_formats_requires_url_param() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(Request::builder().uri("/youtube/formats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_formats_rejects_non_whitelisted_host() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/youtube/formats?url=ftp://youtube.com/watch")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Download endpoint validation
// ============================================================================

#[tokio::test]
async fn test_download_requires_json_body() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/youtube/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "JSON body is required");
}

#[tokio::test]
async fn test_download_requires_url_field() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/youtube/download")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"format": "best"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL parameter is required");
}

#[tokio::test]
async fn test_download_rejects_absolute_download_path() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/youtube/download")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"url": "https://youtu.be/dQw4w9WgXcQ", "download_path": "/etc"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid download_path");
}

// ============================================================================
// File relay
// ============================================================================

#[tokio::test]
async fn test_file_relay_requires_path_param() {
    let dir = tempfile::tempdir().unwrap();
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/youtube/download/file")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "File not found");
}

#[tokio::test]
async fn test_file_relay_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.mp4");
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri(format!("/youtube/download/file?file_path={}", path.display()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_relay_refuses_paths_outside_root() {
    let dir = tempfile::tempdir().unwrap();
    // A file that certainly exists but lives outside the download root
    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri("/youtube/download/file?file_path=/etc/hosts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_relay_streams_file_inside_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"fake video bytes").unwrap();

    let response = test_router(dir.path())
        .oneshot(
            Request::builder()
                .uri(format!("/youtube/download/file?file_path={}", path.display()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("clip.mp4"));

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "video/mp4");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake video bytes");
}

#[tokio::test]
async fn test_file_relay_refuses_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let outside = dir.path().join("secret.txt");
    std::fs::write(&outside, b"secret").unwrap();

    // Serve a subdirectory as the root; the parent file must be refused
    let root = dir.path().join("public");
    std::fs::create_dir(&root).unwrap();

    let traversal = root.join("../secret.txt");
    let response = test_router(&root)
        .oneshot(
            Request::builder()
                .uri(format!("/youtube/download/file?file_path={}", traversal.display()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
