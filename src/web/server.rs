//! HTTP API server setup.
//!
//! Exposes metadata, format listing, download, and file relay
//! endpoints over the yt-dlp extraction layer. Runs on
//! HTTP_HOST:HTTP_PORT (default 0.0.0.0:5000).

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::core::config;
use crate::web::routes::{self, WebState};

/// Builds the API router over the given state.
///
/// Kept separate from [`start_web_server`] so tests can drive the
/// router directly.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/youtube/info", get(routes::youtube_info))
        .route("/youtube/formats", get(routes::youtube_formats))
        .route("/youtube/download", post(routes::youtube_download))
        .route("/youtube/download/file", get(routes::download_file))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Start the HTTP API server.
pub async fn start_web_server(host: &str, port: u16) -> Result<()> {
    let state = WebState::new(config::download_root());
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    log::info!("Starting HTTP API on http://{}", addr);
    log::info!("  GET  /youtube/info?url=       - Video metadata");
    log::info!("  GET  /youtube/formats?url=    - Available formats");
    log::info!("  POST /youtube/download        - Download media");
    log::info!("  GET  /youtube/download/file   - Relay a downloaded file");
    log::info!("  GET  /health                  - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
