//! Tuberelay - HTTP API and Telegram bot for fetching and relaying media
//! from video hosting sites.
//!
//! All extraction and retrieval is delegated to the external `yt-dlp`
//! binary; this crate validates input, assembles yt-dlp invocations,
//! projects the returned JSON into responses, and relays downloaded
//! files back to the caller (HTTP attachment or Telegram upload).
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, validation, common helpers
//! - `download`: yt-dlp invocation, metadata/format projection, fetching
//! - `web`: the axum HTTP API
//! - `telegram`: the teloxide bot front-end

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::config;
pub use crate::core::error::{AppError, AppResult};
pub use crate::download::metadata::VideoInfo;
