use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: tuberelay.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "tuberelay.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// User allowed to run download commands in the bot
/// Read from OWNER_ID environment variable
/// 0 (or unset) disables the restriction; a warning is logged at startup
pub static OWNER_ID: Lazy<i64> = Lazy::new(|| {
    env::var("OWNER_ID").ok().and_then(|s| s.parse().ok()).unwrap_or(0)
});

/// HTTP API bind address
/// Read from HTTP_HOST / HTTP_PORT environment variables
/// Defaults: 0.0.0.0:5000
pub static HTTP_HOST: Lazy<String> = Lazy::new(|| env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()));

pub static HTTP_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("HTTP_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(5000)
});

/// User agent pinned on every yt-dlp request so extraction works without cookies
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Returns the download root with the tilde expanded.
pub fn download_root() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DOWNLOAD_FOLDER.as_str()).to_string())
}

/// Download configuration
pub mod download {
    use super::Duration;

    /// Timeout for yt-dlp metadata commands (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 240; // 4 minutes, to avoid timeouts on slow metadata fetches

    /// Timeout for the actual media download (in seconds)
    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 3600;

    /// yt-dlp metadata command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }

    /// Media download timeout duration
    pub fn download_timeout() -> Duration {
        Duration::from_secs(DOWNLOAD_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for the Telegram HTTP client (in seconds)
    /// Large uploads over the Bot API can take a while
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Metadata cache configuration
pub mod cache {
    use super::Duration;

    /// How long a --dump-json result stays valid (in seconds)
    pub const INFO_TTL_SECS: u64 = 900; // 15 minutes

    pub fn info_ttl() -> Duration {
        Duration::from_secs(INFO_TTL_SECS)
    }
}

/// Format picker keyboard configuration
pub mod keyboard {
    /// Maximum number of format buttons shown in the picker
    pub const MAX_FORMAT_BUTTONS: usize = 20;

    /// Buttons per keyboard row
    pub const BUTTONS_PER_ROW: usize = 2;

    /// Maximum button label length in characters
    pub const MAX_LABEL_CHARS: usize = 20;

    /// Maximum formats listed as text by /ytdl_format
    pub const MAX_TEXT_FORMATS: usize = 15;
}

/// Validation configuration
pub mod validation {
    /// Maximum URL length (RFC 7230 recommends 8000, but we use 2048 for safety)
    pub const MAX_URL_LENGTH: usize = 2048;
}
