//! Format list projection from yt-dlp metadata.
//!
//! Two views over the `formats` array of a --dump-json result:
//!
//! - [`format_summaries`]: the flat per-format listing served by the
//!   HTTP API (format id, container, note, size, resolution).
//! - [`display_formats`]: the picker entries used by the bot — only
//!   formats with a known size, labelled for humans, deduplicated and
//!   sorted by size (videos first, then audio, both descending).

use serde::Serialize;
use serde_json::Value;

use crate::core::utils::human_readable_size;

/// Flat format entry for the HTTP formats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatSummary {
    pub format_id: String,
    pub ext: String,
    pub format_note: String,
    pub filesize: u64,
    pub resolution: String,
}

/// Whether a picker entry is a video or an audio track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Video,
    Audio,
}

/// Human-labelled format entry for the bot picker.
#[derive(Debug, Clone)]
pub struct DisplayFormat {
    pub format_id: String,
    pub label: String,
    pub filesize: u64,
    pub kind: FormatKind,
}

fn filesize_of(format: &Value) -> Option<u64> {
    format
        .get("filesize")
        .or_else(|| format.get("filesize_approx"))
        .and_then(|v| v.as_u64())
}

fn codec_present(format: &Value, key: &str) -> bool {
    format
        .get(key)
        .and_then(|v| v.as_str())
        .map(|c| c != "none")
        .unwrap_or(false)
}

fn str_or<'a>(format: &'a Value, key: &str, default: &'a str) -> &'a str {
    format.get(key).and_then(|v| v.as_str()).unwrap_or(default)
}

/// Extracts the flat per-format listing.
///
/// Formats without a `format_id` are skipped; missing fields are
/// defaulted ("unknown" / 0) rather than dropped.
pub fn format_summaries(json: &Value) -> Vec<FormatSummary> {
    let formats = match json.get("formats").and_then(|v| v.as_array()) {
        Some(formats) => formats,
        None => return Vec::new(),
    };

    formats
        .iter()
        .filter_map(|format| {
            let format_id = format.get("format_id").and_then(|v| v.as_str())?;
            Some(FormatSummary {
                format_id: format_id.to_string(),
                ext: str_or(format, "ext", "unknown").to_string(),
                format_note: str_or(format, "format_note", "unknown").to_string(),
                filesize: filesize_of(format).unwrap_or(0),
                resolution: str_or(format, "resolution", "unknown").to_string(),
            })
        })
        .collect()
}

fn video_label(format: &Value, height: u64, ext: &str, filesize: u64) -> String {
    let mut quality = format!("{}p", height);
    if let Some(fps) = format.get("fps").and_then(|v| v.as_f64()) {
        quality.push_str(&format!("{}", fps.round() as u64));
    }

    let stream_kind = if codec_present(format, "vcodec") && codec_present(format, "acodec") {
        "video+audio"
    } else if codec_present(format, "vcodec") {
        "video"
    } else {
        "audio"
    };

    format!(
        "{} ({}) - {} - {}",
        quality,
        stream_kind,
        ext,
        human_readable_size(filesize)
    )
}

fn audio_label(format: &Value, ext: &str, filesize: u64) -> String {
    let abr = format
        .get("abr")
        .and_then(|v| v.as_f64())
        .map(|a| a.round() as u64)
        .unwrap_or(0);
    format!("audio ({}kbps) - {} - {}", abr, ext, human_readable_size(filesize))
}

/// Builds the deduplicated, size-sorted picker entries.
pub fn display_formats(json: &Value) -> Vec<DisplayFormat> {
    let formats = match json.get("formats").and_then(|v| v.as_array()) {
        Some(formats) => formats,
        None => return Vec::new(),
    };

    let mut entries: Vec<DisplayFormat> = Vec::new();

    for format in formats {
        // Formats without a known size cannot be offered for download
        let filesize = match filesize_of(format) {
            Some(size) => size,
            None => continue,
        };
        let format_id = match format.get("format_id").and_then(|v| v.as_str()) {
            Some(id) => id,
            None => continue,
        };
        let ext = str_or(format, "ext", "unknown");

        if let Some(height) = format.get("height").and_then(|v| v.as_u64()) {
            entries.push(DisplayFormat {
                format_id: format_id.to_string(),
                label: video_label(format, height, ext, filesize),
                filesize,
                kind: FormatKind::Video,
            });
        } else if codec_present(format, "acodec") {
            entries.push(DisplayFormat {
                format_id: format_id.to_string(),
                label: audio_label(format, ext, filesize),
                filesize,
                kind: FormatKind::Audio,
            });
        }
    }

    // Drop duplicate labels, keeping the first occurrence
    let mut seen = std::collections::HashSet::new();
    entries.retain(|entry| seen.insert(entry.label.clone()));

    // Videos first, then audio, each sorted by size descending
    let (mut videos, mut audios): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|entry| entry.kind == FormatKind::Video);
    videos.sort_by(|a, b| b.filesize.cmp(&a.filesize));
    audios.sort_by(|a, b| b.filesize.cmp(&a.filesize));

    videos.extend(audios);
    videos
}
