//! Media download and produced-file resolution.

use std::path::{Path, PathBuf};

use crate::core::config;
use crate::download::errors::DownloadError;
use crate::download::ytdlp::{base_args, run_ytdlp};

/// Output template: title capped at 100 chars, extension decided by yt-dlp.
const OUTPUT_TEMPLATE: &str = "%(title).100s.%(ext)s";

/// Downloads the media at `url` in `format_id` into `dest_dir`.
///
/// Returns the path of the produced file. The filename is computed
/// up-front with `--print filename` so the download and the lookup use
/// the same template; yt-dlp may still rename on collision, which
/// [`find_actual_downloaded_file`] tolerates.
pub async fn download_media(url: &url::Url, format_id: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| DownloadError::Other(format!("Failed to create download directory: {}", e)))?;

    let template = dest_dir.join(OUTPUT_TEMPLATE).to_string_lossy().to_string();

    let mut common = base_args();
    common.push("--restrict-filenames".to_string());
    common.push("-f".to_string());
    common.push(format_id.to_string());
    common.push("-o".to_string());
    common.push(template);

    // Ask yt-dlp which filename the template resolves to
    let mut print_args = common.clone();
    print_args.insert(0, "--print".to_string());
    print_args.insert(1, "filename".to_string());
    print_args.push(url.as_str().to_string());

    let expected = run_ytdlp(&print_args, config::download::ytdlp_timeout())
        .await?
        .trim()
        .to_string();

    if expected.is_empty() {
        return Err(DownloadError::Other(
            "yt-dlp did not report an output filename".to_string(),
        ));
    }

    log::info!("Downloading {} (format {}) -> {}", url, format_id, expected);

    let mut download_args = common;
    download_args.push("--no-overwrites".to_string());
    download_args.push("--no-progress".to_string());
    download_args.push(url.as_str().to_string());

    run_ytdlp(&download_args, config::download::download_timeout()).await?;

    let actual = find_actual_downloaded_file(Path::new(&expected))?;
    log::info!("Download finished: {}", actual.display());

    Ok(actual)
}

/// Finds the actual downloaded file path after a yt-dlp download.
///
/// With `--no-overwrites` yt-dlp appends suffixes like ` (1).mp4` when
/// a file already exists, so the expected path may not be the produced
/// one.
pub fn find_actual_downloaded_file(expected: &Path) -> Result<PathBuf, DownloadError> {
    if expected.exists() {
        return Ok(expected.to_path_buf());
    }

    let dir = expected
        .parent()
        .ok_or_else(|| DownloadError::Other(format!("No parent directory for {}", expected.display())))?;
    let stem = expected
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = expected
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    // Check the suffixed variants yt-dlp produces on collision
    for n in 1..=9 {
        let candidate = dir.join(format!("{} ({}).{}", stem, n, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Last resort: the newest file in the directory sharing the stem
    // (yt-dlp may have merged into a different container)
    let mut best: Option<(PathBuf, std::time::SystemTime)> = None;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            if !name.starts_with(&stem) || !path.is_file() {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            if best.as_ref().is_none_or(|(_, current)| modified > *current) {
                best = Some((path, modified));
            }
        }
    }

    best.map(|(path, _)| path)
        .ok_or_else(|| DownloadError::Other(format!("Downloaded file not found: {}", expected.display())))
}
