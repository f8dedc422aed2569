use thiserror::Error;

/// Errors produced by the download layer.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// yt-dlp returned a non-zero exit status
    #[error("yt-dlp error: {0}")]
    YtDlp(String),

    /// A yt-dlp invocation exceeded its timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Anything else (missing file, bad output, ...)
    #[error("{0}")]
    Other(String),
}

impl DownloadError {
    /// Message safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::YtDlp(msg) => msg.clone(),
            DownloadError::Timeout(_) => "The request took too long, try again later".to_string(),
            DownloadError::Other(msg) => msg.clone(),
        }
    }
}

/// Classified yt-dlp failure kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YtDlpErrorKind {
    /// Video is private, removed, or region-locked
    VideoUnavailable,
    /// The platform rejected the request as automated
    BotDetection,
    /// Timeouts, DNS, connection resets
    NetworkError,
    /// Anything we cannot classify
    Unknown,
}

/// Classifies yt-dlp stderr output into an error kind.
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorKind {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
    {
        return YtDlpErrorKind::VideoUnavailable;
    }

    if stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("bot detection")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("unable to extract")
        || stderr_lower.contains("signature extraction failed")
    {
        return YtDlpErrorKind::BotDetection;
    }

    if stderr_lower.contains("timeout")
        || stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("socket")
        || stderr_lower.contains("dns")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorKind::NetworkError;
    }

    YtDlpErrorKind::Unknown
}

/// User-facing message for a classified error kind.
pub fn user_error_message(kind: &YtDlpErrorKind) -> String {
    match kind {
        YtDlpErrorKind::VideoUnavailable => {
            "Video is unavailable. It might be private, removed, or blocked in your region.".to_string()
        }
        YtDlpErrorKind::BotDetection => {
            "The platform rejected the request. Try another video or retry later.".to_string()
        }
        YtDlpErrorKind::NetworkError => "Network problem, try again in a minute.".to_string(),
        YtDlpErrorKind::Unknown => "Could not process the video. Check that the link is correct.".to_string(),
    }
}
