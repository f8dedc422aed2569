use anyhow::Result;
use dotenvy::dotenv;

use tuberelay::cli::{Cli, Commands};
use tuberelay::core::logging::log_startup_configuration;
use tuberelay::core::utils::human_readable_size;
use tuberelay::core::validation::validate_media_url;
use tuberelay::core::{config, init_logger};
use tuberelay::download::formats::format_summaries;
use tuberelay::download::metadata::{fetch_raw_info, fetch_video_info};
use tuberelay::download::ytdlp;
use tuberelay::telegram;
use tuberelay::web;

/// Main entry point.
///
/// Parses CLI arguments and dispatches to the appropriate front-end.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;
    log_startup_configuration();

    if let Err(e) = ytdlp::check_ytdlp_version().await {
        log::warn!(
            "yt-dlp check failed: {}. Extraction will not work until it is installed.",
            e
        );
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(*config::HTTP_PORT);
            web::start_web_server(config::HTTP_HOST.as_str(), port).await
        }
        Some(Commands::Bot) => telegram::run_bot().await,
        Some(Commands::Info { url, json }) => run_cli_info(&url, json).await,
        Some(Commands::Formats { url }) => run_cli_formats(&url).await,
        Some(Commands::Run) | None => run_both().await,
    }
}

/// Run the HTTP API and the Telegram bot concurrently.
///
/// Without a bot token only the HTTP API is started.
async fn run_both() -> Result<()> {
    let server = tokio::spawn(web::start_web_server(config::HTTP_HOST.as_str(), *config::HTTP_PORT));

    if config::BOT_TOKEN.is_empty() {
        log::warn!("BOT_TOKEN not set, running HTTP API only");
        return server.await?;
    }

    tokio::select! {
        result = server => result?,
        result = telegram::run_bot() => result,
    }
}

/// One-shot metadata dump to stdout.
async fn run_cli_info(url: &str, raw_json: bool) -> Result<()> {
    let url = validate_media_url(url)?;

    if raw_json {
        let json = fetch_raw_info(&url).await?;
        println!("{}", serde_json::to_string_pretty(&*json)?);
        return Ok(());
    }

    let info = fetch_video_info(&url).await?;
    println!("Title:     {}", info.title);
    println!("Uploader:  {}", info.uploader.as_deref().unwrap_or("Unknown"));
    if let Some(duration) = info.duration {
        println!("Duration:  {}", tuberelay::core::utils::format_duration(duration));
    }
    if let Some(views) = info.view_count {
        println!("Views:     {}", views);
    }
    if let Some(thumbnail) = &info.thumbnail {
        println!("Thumbnail: {}", thumbnail);
    }
    println!("URL:       {}", info.webpage_url);

    Ok(())
}

/// One-shot format table to stdout.
async fn run_cli_formats(url: &str) -> Result<()> {
    let url = validate_media_url(url)?;
    let json = fetch_raw_info(&url).await?;

    let summaries = format_summaries(&json);
    if summaries.is_empty() {
        println!("No formats reported for {}", url);
        return Ok(());
    }

    println!("{:<12} {:<8} {:<14} {:<12} {}", "ID", "EXT", "RESOLUTION", "SIZE", "NOTE");
    for summary in summaries {
        let size = if summary.filesize > 0 {
            human_readable_size(summary.filesize)
        } else {
            "-".to_string()
        };
        println!(
            "{:<12} {:<8} {:<14} {:<12} {}",
            summary.format_id, summary.ext, summary.resolution, size, summary.format_note
        );
    }

    Ok(())
}
