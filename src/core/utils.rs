//! Small formatting helpers shared by both front-ends.

/// Converts a byte count to a human readable string (two decimals).
pub fn human_readable_size(size_in_bytes: u64) -> String {
    if size_in_bytes == 0 {
        return "0 B".to_string();
    }

    const SIZE_NAMES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = size_in_bytes as f64;
    let mut i = 0;
    while size >= 1024.0 && i < SIZE_NAMES.len() - 1 {
        size /= 1024.0;
        i += 1;
    }
    format!("{:.2} {}", size, SIZE_NAMES[i])
}

/// Format seconds as M:SS or H:MM:SS.
pub fn format_duration(secs: u32) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Escapes HTML entities for Telegram HTML parse mode and web output.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncates a string to `max_chars` characters, appending "..." when cut.
///
/// Operates on characters, not bytes, so multi-byte titles never split
/// inside a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
