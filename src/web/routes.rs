//! HTTP API handlers.
//!
//! Response contract: successes are `{"success": true, ...}`, failures
//! are `{"error": "..."}` with 400 (bad input), 404 (missing file), or
//! 500 (extraction failure).

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;

use crate::core::validation::{sanitize_path, validate_media_url};
use crate::download::errors::DownloadError;
use crate::download::fetch::download_media;
use crate::download::formats::format_summaries;
use crate::download::metadata::{fetch_raw_info, fetch_video_info};

/// Shared state for the web server.
#[derive(Clone)]
pub struct WebState {
    /// Root directory downloads land in; the file relay endpoint only
    /// serves paths inside it.
    pub download_root: PathBuf,
}

impl WebState {
    pub fn new(download_root: PathBuf) -> Self {
        Self { download_root }
    }
}

#[derive(Deserialize)]
pub struct UrlQuery {
    url: Option<String>,
}

#[derive(Deserialize)]
pub struct FileQuery {
    file_path: Option<String>,
}

fn default_format() -> String {
    "best".to_string()
}

fn default_download_path() -> String {
    "downloads".to_string()
}

#[derive(Deserialize)]
pub struct DownloadRequest {
    url: Option<String>,
    #[serde(default = "default_format")]
    format: String,
    #[serde(default = "default_download_path")]
    download_path: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn download_error_response(err: &DownloadError) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.user_message())
}

/// Parses and validates the `url` query parameter.
fn require_url(raw: Option<&str>) -> Result<url::Url, Response> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(error_response(StatusCode::BAD_REQUEST, "URL parameter is required")),
    };

    validate_media_url(raw).map_err(|e| {
        log::warn!("Rejected URL: {}", e);
        error_response(StatusCode::BAD_REQUEST, "Invalid URL")
    })
}

/// GET /youtube/info?url= — video metadata without downloading.
pub async fn youtube_info(Query(params): Query<UrlQuery>) -> Response {
    let url = match require_url(params.url.as_deref()) {
        Ok(url) => url,
        Err(response) => return response,
    };

    match fetch_video_info(&url).await {
        Ok(info) => Json(json!({
            "success": true,
            "info": {
                "title": info.title,
                "duration": info.duration,
                "uploader": info.uploader,
                "view_count": info.view_count,
                "thumbnail": info.thumbnail,
                "description": info.short_description(200),
            }
        }))
        .into_response(),
        Err(e) => {
            log::error!("Error getting video info for {}: {}", url, e);
            download_error_response(&e)
        }
    }
}

/// GET /youtube/formats?url= — available formats for a video.
pub async fn youtube_formats(Query(params): Query<UrlQuery>) -> Response {
    let url = match require_url(params.url.as_deref()) {
        Ok(url) => url,
        Err(response) => return response,
    };

    let json_metadata = match fetch_raw_info(&url).await {
        Ok(value) => value,
        Err(e) => {
            log::error!("Error getting formats for {}: {}", url, e);
            return download_error_response(&e);
        }
    };

    let formats = format_summaries(&json_metadata);
    if formats.is_empty() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not fetch available formats");
    }

    Json(json!({ "success": true, "formats": formats })).into_response()
}

/// POST /youtube/download — download media into the configured root.
pub async fn youtube_download(
    State(state): State<WebState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "JSON body is required"),
    };

    let url = match require_url(request.url.as_deref()) {
        Ok(url) => url,
        Err(response) => return response,
    };

    let subdir = match sanitize_path(&request.download_path) {
        Ok(subdir) => subdir,
        Err(e) => {
            log::warn!("Rejected download_path '{}': {}", request.download_path, e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid download_path");
        }
    };
    let dest_dir = state.download_root.join(subdir);

    // Fetch metadata first so unavailable videos fail before the download
    let info = match fetch_video_info(&url).await {
        Ok(info) => info,
        Err(e) => {
            log::error!("Download rejected, metadata fetch failed for {}: {}", url, e);
            return download_error_response(&e);
        }
    };
    log::info!("Downloading: {}", info.title);

    match download_media(&url, &request.format, &dest_dir).await {
        Ok(file_path) => {
            let filename = file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Json(json!({
                "success": true,
                "message": "Download completed successfully",
                "file_path": file_path.to_string_lossy(),
                "filename": filename,
            }))
            .into_response()
        }
        Err(e) => {
            log::error!("Download failed for {}: {}", url, e);
            download_error_response(&e)
        }
    }
}

/// Resolves a requested relay path, requiring it to live inside the
/// download root.
fn resolve_relay_path(root: &Path, requested: &str) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let path = Path::new(requested).canonicalize().ok()?;
    if path.is_file() && path.starts_with(&root) {
        Some(path)
    } else {
        None
    }
}

/// GET /youtube/download/file?file_path= — stream a downloaded file back.
pub async fn download_file(State(state): State<WebState>, Query(params): Query<FileQuery>) -> Response {
    let requested = match params.file_path.as_deref() {
        Some(path) if !path.is_empty() => path,
        _ => return error_response(StatusCode::NOT_FOUND, "File not found"),
    };

    let Some(path) = resolve_relay_path(&state.download_root, requested) else {
        log::warn!("Refused file relay for '{}'", requested);
        return error_response(StatusCode::NOT_FOUND, "File not found");
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            log::error!("File relay open error for {}: {}", path.display(), e);
            return error_response(StatusCode::NOT_FOUND, "File not found");
        }
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    let body = Body::from_stream(ReaderStream::new(file));
    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
    {
        Ok(response) => response,
        Err(e) => {
            log::error!("Failed to build file response: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

/// GET /health — simple health check.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
