//! yt-dlp subprocess plumbing.
//!
//! Every call into the extraction binary goes through this module:
//! the shared cookie-free argument profile, the timeout-wrapped
//! runner, and the startup version probe.

use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::core::config;
use crate::download::errors::{analyze_ytdlp_error, user_error_message, DownloadError};

/// Base arguments shared by every yt-dlp invocation.
///
/// This is the cookie-free profile: a pinned desktop user agent and no
/// cookie sources, which works for the vast majority of public videos.
pub fn base_args() -> Vec<String> {
    vec![
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--no-check-certificates".to_string(),
        "--retries".to_string(),
        "2".to_string(),
        "--socket-timeout".to_string(),
        "30".to_string(),
        "--user-agent".to_string(),
        config::USER_AGENT.to_string(),
    ]
}

/// Runs yt-dlp with the given arguments, returning captured stdout.
///
/// The invocation is wrapped in `limit`; stderr of a failed run is
/// classified into a user-facing message and logged verbatim.
pub async fn run_ytdlp(args: &[String], limit: Duration) -> Result<String, DownloadError> {
    let ytdl_bin = &*config::YTDL_BIN;

    let command_str = format!("{} {}", ytdl_bin, args.join(" "));
    log::debug!("yt-dlp command: {}", command_str);

    let output = match timeout(limit, TokioCommand::new(ytdl_bin).args(args).output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(DownloadError::YtDlp(format!("Failed to execute {}: {}", ytdl_bin, e)));
        }
        Err(_) => {
            log::warn!("yt-dlp command timed out after {:?}", limit);
            return Err(DownloadError::Timeout(format!(
                "yt-dlp timed out after {} seconds",
                limit.as_secs()
            )));
        }
    };

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let kind = analyze_ytdlp_error(&stderr);
    log::error!("yt-dlp failed (exit {:?}), error kind: {:?}", output.status.code(), kind);
    log::error!("yt-dlp stderr: {}", stderr);

    Err(DownloadError::YtDlp(user_error_message(&kind)))
}

/// Prints and logs the current yt-dlp version.
///
/// Returns an error when the binary is missing or produces no output,
/// so startup can fail fast on a broken deployment.
pub async fn check_ytdlp_version() -> Result<String, DownloadError> {
    let ytdl_bin = &*config::YTDL_BIN;

    log::info!("Checking yt-dlp version...");

    let output = TokioCommand::new(ytdl_bin)
        .arg("--version")
        .output()
        .await
        .map_err(|e| DownloadError::Other(format!("Failed to get yt-dlp version: {}", e)))?;

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if version.is_empty() {
        return Err(DownloadError::Other(
            "yt-dlp is not installed or --version produced no output".to_string(),
        ));
    }

    log::info!("yt-dlp version: {}", version);

    Ok(version)
}
