//! Video metadata extraction via yt-dlp --dump-json.
//!
//! All metadata comes from a single --dump-json call per URL (cached);
//! `VideoInfo` is the projection both front-ends work with.

use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::core::config;
use crate::download::cache::INFO_CACHE;
use crate::download::errors::DownloadError;
use crate::download::ytdlp::{base_args, run_ytdlp};

/// Metadata projection of a single media item.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub title: String,
    pub duration: Option<u32>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub webpage_url: String,
}

impl VideoInfo {
    /// Builds the projection from a raw --dump-json value.
    ///
    /// An absent or empty title means the video is unavailable and is
    /// treated as an error rather than defaulted.
    pub fn from_json(json: &Value, fallback_url: &Url) -> Result<Self, DownloadError> {
        let title = get_json_value(json, "title").ok_or_else(|| {
            DownloadError::YtDlp("Failed to get video title. Video might be unavailable or private.".to_string())
        })?;

        let duration = get_json_value(json, "duration")
            .and_then(|d| d.parse::<f64>().ok())
            .map(|d| d as u32);

        let thumbnail = get_json_value(json, "thumbnail").or_else(|| best_thumbnail_from_array(json));

        Ok(Self {
            title,
            duration,
            uploader: get_json_value(json, "uploader"),
            view_count: get_json_value(json, "view_count").and_then(|v| v.parse().ok()),
            like_count: get_json_value(json, "like_count").and_then(|v| v.parse().ok()),
            thumbnail,
            description: get_json_value(json, "description"),
            webpage_url: get_json_value(json, "webpage_url").unwrap_or_else(|| fallback_url.as_str().to_string()),
        })
    }

    /// Description truncated to `max_chars` with a trailing "...".
    pub fn short_description(&self, max_chars: usize) -> String {
        match &self.description {
            Some(desc) => crate::core::utils::truncate_chars(desc, max_chars),
            None => String::new(),
        }
    }
}

/// Extracts a value from JSON by key.
///
/// Strings and numbers are returned as trimmed strings; null, empty
/// and the "NA" placeholder count as absent.
pub fn get_json_value(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| {
            if v.is_null() {
                None
            } else if v.is_string() {
                v.as_str().map(|s| s.to_string())
            } else if v.is_number() {
                Some(v.to_string())
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "NA")
}

/// Picks the widest entry of the `thumbnails` array.
fn best_thumbnail_from_array(json: &Value) -> Option<String> {
    json.get("thumbnails").and_then(|v| v.as_array()).and_then(|arr| {
        arr.iter()
            .filter_map(|thumb| {
                thumb.get("url").and_then(|v| v.as_str()).map(|url| {
                    let width = thumb.get("width").and_then(|v| v.as_u64()).unwrap_or(0);
                    (url.to_string(), width)
                })
            })
            .max_by_key(|(_, width)| *width)
            .map(|(url, _)| url)
    })
}

/// Fetches the raw --dump-json metadata for a URL, going through the cache.
pub async fn fetch_raw_info(url: &Url) -> Result<Arc<Value>, DownloadError> {
    if let Some(cached) = INFO_CACHE.get(url.as_str()).await {
        log::debug!("Metadata cache hit for {}", url);
        return Ok(cached);
    }

    let mut args = base_args();
    args.insert(0, "--dump-json".to_string());
    args.push(url.as_str().to_string());

    let stdout = run_ytdlp(&args, config::download::ytdlp_timeout()).await?;

    let json: Value = serde_json::from_str(&stdout)
        .map_err(|e| DownloadError::YtDlp(format!("Failed to parse metadata JSON: {}", e)))?;

    let json = Arc::new(json);
    INFO_CACHE.set(url.as_str().to_string(), Arc::clone(&json)).await;

    Ok(json)
}

/// Fetches and projects metadata for a URL.
pub async fn fetch_video_info(url: &Url) -> Result<VideoInfo, DownloadError> {
    let json = fetch_raw_info(url).await?;
    let info = VideoInfo::from_json(&json, url)?;
    log::debug!("Fetched metadata for {}: '{}'", url, info.title);
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_url() -> Url {
        Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    // ==================== get_json_value tests ====================

    #[test]
    fn test_get_json_value_string() {
        let json = json!({"title": "Test Video"});
        assert_eq!(get_json_value(&json, "title"), Some("Test Video".to_string()));
    }

    #[test]
    fn test_get_json_value_number() {
        let json = json!({"duration": 120});
        assert_eq!(get_json_value(&json, "duration"), Some("120".to_string()));
    }

    #[test]
    fn test_get_json_value_null() {
        let json = json!({"title": null});
        assert_eq!(get_json_value(&json, "title"), None);
    }

    #[test]
    fn test_get_json_value_missing() {
        let json = json!({"other": "value"});
        assert_eq!(get_json_value(&json, "title"), None);
    }

    #[test]
    fn test_get_json_value_empty_string() {
        let json = json!({"title": ""});
        assert_eq!(get_json_value(&json, "title"), None);
    }

    #[test]
    fn test_get_json_value_na() {
        let json = json!({"title": "NA"});
        assert_eq!(get_json_value(&json, "title"), None);
    }

    #[test]
    fn test_get_json_value_trims_whitespace() {
        let json = json!({"title": "  Test  "});
        assert_eq!(get_json_value(&json, "title"), Some("Test".to_string()));
    }

    // ==================== VideoInfo::from_json tests ====================

    #[test]
    fn test_from_json_full() {
        let json = json!({
            "title": "Test Video",
            "duration": 185.4,
            "uploader": "Test Channel",
            "view_count": 12345,
            "like_count": 678,
            "thumbnail": "https://i.ytimg.com/vi/abc/hq720.jpg",
            "description": "A description",
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        });

        let info = VideoInfo::from_json(&json, &test_url()).unwrap();
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.duration, Some(185));
        assert_eq!(info.uploader.as_deref(), Some("Test Channel"));
        assert_eq!(info.view_count, Some(12345));
        assert_eq!(info.like_count, Some(678));
        assert_eq!(info.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/abc/hq720.jpg"));
        assert_eq!(info.webpage_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_from_json_missing_title_is_error() {
        let json = json!({"duration": 120});
        assert!(VideoInfo::from_json(&json, &test_url()).is_err());
    }

    #[test]
    fn test_from_json_empty_title_is_error() {
        let json = json!({"title": "   "});
        assert!(VideoInfo::from_json(&json, &test_url()).is_err());
    }

    #[test]
    fn test_from_json_defaults() {
        let json = json!({"title": "Only Title"});
        let info = VideoInfo::from_json(&json, &test_url()).unwrap();
        assert_eq!(info.duration, None);
        assert_eq!(info.uploader, None);
        assert_eq!(info.thumbnail, None);
        // webpage_url falls back to the requested URL
        assert_eq!(info.webpage_url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_from_json_thumbnail_array_fallback() {
        let json = json!({
            "title": "T",
            "thumbnails": [
                {"url": "https://example.com/small.jpg", "width": 120},
                {"url": "https://example.com/large.jpg", "width": 1280},
                {"url": "https://example.com/mid.jpg", "width": 640}
            ]
        });
        let info = VideoInfo::from_json(&json, &test_url()).unwrap();
        assert_eq!(info.thumbnail.as_deref(), Some("https://example.com/large.jpg"));
    }

    #[test]
    fn test_short_description_truncates() {
        let json = json!({"title": "T", "description": "a".repeat(300)});
        let info = VideoInfo::from_json(&json, &test_url()).unwrap();
        let short = info.short_description(200);
        assert_eq!(short.chars().count(), 203); // 200 + "..."
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_short_description_absent() {
        let json = json!({"title": "T"});
        let info = VideoInfo::from_json(&json, &test_url()).unwrap();
        assert_eq!(info.short_description(200), "");
    }
}
