//! Integration tests for format projection over a realistic
//! yt-dlp --dump-json fixture.
//!
//! Run with: cargo test --test formats_test

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use tuberelay::download::formats::{display_formats, format_summaries, FormatKind};
use tuberelay::download::metadata::VideoInfo;

/// A trimmed-down but realistically shaped dump for a 3-minute video.
fn fixture() -> Value {
    json!({
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "uploader": "Rick Astley",
        "duration": 213,
        "view_count": 1400000000u64,
        "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "thumbnails": [
            {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "width": 120},
            {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg", "width": 1920}
        ],
        "formats": [
            // Storyboard - no id-worthy media, no size
            {"format_id": "sb0", "ext": "mhtml", "format_note": "storyboard",
             "vcodec": "none", "acodec": "none", "resolution": "48x27"},
            // Audio-only tracks
            {"format_id": "140", "ext": "m4a", "format_note": "medium",
             "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.476,
             "filesize": 3458297, "resolution": "audio only"},
            {"format_id": "251", "ext": "webm", "format_note": "medium",
             "vcodec": "none", "acodec": "opus", "abr": 139.874,
             "filesize": 3691029, "resolution": "audio only"},
            // Video-only tracks
            {"format_id": "137", "ext": "mp4", "format_note": "1080p",
             "vcodec": "avc1.640028", "acodec": "none", "height": 1080, "fps": 25,
             "filesize": 84924123, "resolution": "1920x1080"},
            {"format_id": "136", "ext": "mp4", "format_note": "720p",
             "vcodec": "avc1.4d401f", "acodec": "none", "height": 720, "fps": 25,
             "filesize": 45231990, "resolution": "1280x720"},
            // Muxed
            {"format_id": "18", "ext": "mp4", "format_note": "360p",
             "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "fps": 25,
             "filesize_approx": 15728640, "resolution": "640x360"}
        ]
    })
}

#[test]
fn summaries_cover_every_identified_format() {
    let summaries = format_summaries(&fixture());

    // Even the storyboard is listed - the flat view defaults instead of filtering
    assert_eq!(summaries.len(), 6);

    let muxed = summaries.iter().find(|s| s.format_id == "18").unwrap();
    assert_eq!(muxed.ext, "mp4");
    assert_eq!(muxed.format_note, "360p");
    assert_eq!(muxed.filesize, 15728640); // filesize_approx fallback
    assert_eq!(muxed.resolution, "640x360");

    let storyboard = summaries.iter().find(|s| s.format_id == "sb0").unwrap();
    assert_eq!(storyboard.filesize, 0);
}

#[test]
fn picker_skips_unsized_and_orders_by_size() {
    let formats = display_formats(&fixture());

    let ids: Vec<&str> = formats.iter().map(|f| f.format_id.as_str()).collect();
    // Videos by size descending, then audio by size descending
    assert_eq!(ids, vec!["137", "136", "18", "251", "140"]);

    assert!(formats.iter().all(|f| f.filesize > 0));
    assert_eq!(
        formats.iter().filter(|f| f.kind == FormatKind::Video).count(),
        3
    );
    assert_eq!(
        formats.iter().filter(|f| f.kind == FormatKind::Audio).count(),
        2
    );
}

#[test]
fn picker_labels_are_human_readable() {
    let formats = display_formats(&fixture());

    let muxed = formats.iter().find(|f| f.format_id == "18").unwrap();
    assert_eq!(muxed.label, "360p25 (video+audio) - mp4 - 15.00 MB");

    let video_only = formats.iter().find(|f| f.format_id == "137").unwrap();
    assert_eq!(video_only.label, "1080p25 (video) - mp4 - 80.99 MB");

    let audio = formats.iter().find(|f| f.format_id == "140").unwrap();
    assert_eq!(audio.label, "audio (129kbps) - m4a - 3.30 MB");
}

#[test]
fn metadata_projection_from_same_fixture() {
    let url = url::Url::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
    let info = VideoInfo::from_json(&fixture(), &url).unwrap();

    assert_eq!(info.title, "Never Gonna Give You Up");
    assert_eq!(info.uploader.as_deref(), Some("Rick Astley"));
    assert_eq!(info.duration, Some(213));
    assert_eq!(info.view_count, Some(1400000000));
    // Widest thumbnail wins when no top-level `thumbnail` field exists
    assert_eq!(
        info.thumbnail.as_deref(),
        Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
    );
    assert_eq!(info.webpage_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
}
