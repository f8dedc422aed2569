//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup configuration banner

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the resolved runtime configuration at startup.
pub fn log_startup_configuration() {
    log::info!("yt-dlp binary: {}", *config::YTDL_BIN);
    log::info!("Download root: {}", config::download_root().display());

    if *config::OWNER_ID == 0 {
        log::warn!("OWNER_ID not set - bot download commands are open to all users");
    } else {
        log::info!("Bot commands restricted to owner id {}", *config::OWNER_ID);
    }

    if config::BOT_TOKEN.is_empty() {
        log::warn!("BOT_TOKEN not set - the Telegram front-end cannot start");
    }
}
