//! URL and path validation utilities
//!
//! Provides security-focused validation for user inputs:
//! - Media URL validation (whitelist-based)
//! - Path sanitization (prevent directory traversal)
//! - Filename sanitization (remove filesystem-unsafe characters)

use std::path::{Component, Path};
use thiserror::Error;
use url::Url;

use crate::core::config;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid URL format or unsupported domain
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Path validation failed (traversal attempt, absolute path, etc.)
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Empty result after sanitization
    #[error("Path '{0}' is empty after sanitization")]
    EmptyPath(String),
}

/// Validates that a string is a supported media URL and parses it.
///
/// # Security
/// Uses whitelist approach:
/// - Only HTTP/HTTPS schemes allowed
/// - Only youtube.com, youtu.be, youtube-nocookie.com domains (+ subdomains)
/// - Length capped at `config::validation::MAX_URL_LENGTH`
pub fn validate_media_url(url: &str) -> Result<Url, ValidationError> {
    if url.len() > config::validation::MAX_URL_LENGTH {
        return Err(ValidationError::InvalidUrl(format!(
            "URL too long ({} chars, max {})",
            url.len(),
            config::validation::MAX_URL_LENGTH
        )));
    }

    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;

    // Only HTTP and HTTPS are allowed
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "{} (invalid scheme: {})",
            url,
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ValidationError::InvalidUrl(format!("{} (no host)", url)))?;

    let is_supported = host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
        || host == "youtube-nocookie.com"
        || host.ends_with(".youtube-nocookie.com");

    if !is_supported {
        return Err(ValidationError::InvalidUrl(format!(
            "{} (unsupported domain: {})",
            url, host
        )));
    }

    Ok(parsed)
}

/// Sanitizes a file path by removing dangerous components.
///
/// # Security
/// Prevents directory traversal attacks by:
/// - Rejecting absolute paths
/// - Removing parent directory references (`..`)
/// - Removing root references and Windows path prefixes
pub fn sanitize_path(path: &str) -> Result<String, ValidationError> {
    if Path::new(path).is_absolute() {
        return Err(ValidationError::InvalidPath {
            path: path.to_string(),
            reason: "absolute paths not allowed".to_string(),
        });
    }

    let components: Vec<_> = Path::new(path)
        .components()
        .filter_map(|c| match c {
            Component::ParentDir | Component::RootDir => None,
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            Component::CurDir => Some(".".to_string()),
            Component::Prefix(_) => None,
        })
        .collect();

    if components.is_empty() {
        return Err(ValidationError::EmptyPath(path.to_string()));
    }

    Ok(components.join("/"))
}

/// Sanitizes a filename by removing filesystem-unsafe characters.
///
/// Removes path separators, reserved characters (`:*?"<>|`) and
/// control characters.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !['/', '\\', ':', '*', '?', '"', '<', '>', '|'].contains(c))
        .filter(|c| !c.is_control())
        .collect()
}
