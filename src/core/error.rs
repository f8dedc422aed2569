use thiserror::Error;

use crate::core::validation::ValidationError;
use crate::download::errors::DownloadError;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Message safe to show to end users (HTTP clients, Telegram chats).
    ///
    /// Download errors already carry a classified user-facing message;
    /// everything else collapses to a generic line so internals don't leak.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Download(err) => err.user_message(),
            AppError::Validation(err) => err.to_string(),
            AppError::Url(_) => "Invalid URL".to_string(),
            _ => "Internal error, try again later".to_string(),
        }
    }
}
