//! Download command and callback flows.
//!
//! `/ytdl <url>` shows a metadata summary with a format picker,
//! `/ytdl_format <url>` lists formats as text, and the callback flow
//! downloads the chosen format and uploads it back to the chat.

use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Message, MessageId, ParseMode};

use crate::core::config;
use crate::core::error::AppError;
use crate::core::utils::{escape_html, format_duration, human_readable_size};
use crate::core::validation::validate_media_url;
use crate::download::fetch::download_media;
use crate::download::formats::{display_formats, DisplayFormat};
use crate::download::metadata::{fetch_raw_info, VideoInfo};
use crate::telegram::bot::is_authorized;
use crate::telegram::keyboard::{format_keyboard, parse_callback, CANCEL_DATA};
use crate::telegram::pending::PENDING;
use crate::telegram::Bot;

/// Extensions uploaded as video messages; everything else goes as audio.
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "webm", "flv", "mov", "avi"];

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Handle /start
pub async fn handle_start(bot: &Bot, msg: &Message) -> Result<(), AppError> {
    bot.send_message(
        msg.chat.id,
        "Send /ytdl <url> to download a video with interactive format selection,\n\
         or /ytdl_format <url> to list the available formats.",
    )
    .await?;
    Ok(())
}

/// Validates command input shared by /ytdl and /ytdl_format.
///
/// Sends the appropriate reply and returns None when the command
/// should not proceed.
async fn check_command_input(bot: &Bot, msg: &Message, args: &str, usage: &str) -> Result<Option<url::Url>, AppError> {
    if !is_authorized(msg.from.as_ref()) {
        log::warn!(
            "Unauthorized download command from chat {} (user {:?})",
            msg.chat.id,
            msg.from.as_ref().map(|u| u.id)
        );
        bot.send_message(msg.chat.id, "This command is restricted to the bot owner.")
            .await?;
        return Ok(None);
    }

    if args.is_empty() {
        bot.send_message(msg.chat.id, format!("Please provide a YouTube URL.\nUsage: {}", usage))
            .await?;
        return Ok(None);
    }

    match validate_media_url(args) {
        Ok(url) => Ok(Some(url)),
        Err(e) => {
            log::warn!("Rejected URL from chat {}: {}", msg.chat.id, e);
            bot.send_message(msg.chat.id, "Please provide a valid YouTube URL.").await?;
            Ok(None)
        }
    }
}

/// Handle /ytdl <url> — metadata summary + format picker.
pub async fn handle_ytdl(bot: &Bot, msg: &Message, args: &str) -> Result<(), AppError> {
    let Some(url) = check_command_input(bot, msg, args, "/ytdl <url>").await? else {
        return Ok(());
    };

    let processing = bot
        .send_message(msg.chat.id, "🔍 Fetching video information...")
        .await?;

    let json = match fetch_raw_info(&url).await {
        Ok(json) => json,
        Err(e) => {
            bot.edit_message_text(msg.chat.id, processing.id, format!("❌ {}", e.user_message()))
                .await?;
            return Ok(());
        }
    };

    let info = match VideoInfo::from_json(&json, &url) {
        Ok(info) => info,
        Err(_) => {
            bot.edit_message_text(
                msg.chat.id,
                processing.id,
                "❌ Failed to fetch video information. The video might be private or unavailable.",
            )
            .await?;
            return Ok(());
        }
    };

    let formats = display_formats(&json);
    if formats.is_empty() {
        bot.edit_message_text(msg.chat.id, processing.id, "❌ No downloadable formats found.")
            .await?;
        return Ok(());
    }

    let text = render_preview_text(&info, formats.len());
    bot.edit_message_text(msg.chat.id, processing.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(format_keyboard(&formats))
        .await?;

    let requested_by = msg
        .from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0);
    PENDING.insert(msg.chat.id.0, processing.id.0, url, info.title, requested_by);

    Ok(())
}

fn render_preview_text(info: &VideoInfo, format_count: usize) -> String {
    let duration = info
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown".to_string());
    let uploader = info.uploader.as_deref().unwrap_or("Unknown");

    format!(
        "📹 <b>Title:</b> {}\n\
         👤 <b>Uploader:</b> {}\n\
         ⏱ <b>Duration:</b> {}\n\
         📊 <b>Available formats:</b> {}\n\n\
         <b>Select a format to download:</b>",
        escape_html(&info.title),
        escape_html(uploader),
        duration,
        format_count
    )
}

/// Handle /ytdl_format <url> — text listing of formats.
pub async fn handle_ytdl_format(bot: &Bot, msg: &Message, args: &str) -> Result<(), AppError> {
    let Some(url) = check_command_input(bot, msg, args, "/ytdl_format <url>").await? else {
        return Ok(());
    };

    let processing = bot
        .send_message(msg.chat.id, "🔍 Fetching available formats...")
        .await?;

    let json = match fetch_raw_info(&url).await {
        Ok(json) => json,
        Err(e) => {
            bot.edit_message_text(msg.chat.id, processing.id, format!("❌ {}", e.user_message()))
                .await?;
            return Ok(());
        }
    };

    let title = VideoInfo::from_json(&json, &url)
        .map(|info| info.title)
        .unwrap_or_else(|_| "Unknown".to_string());

    let formats = display_formats(&json);
    if formats.is_empty() {
        bot.edit_message_text(msg.chat.id, processing.id, "❌ No formats available.")
            .await?;
        return Ok(());
    }

    bot.edit_message_text(msg.chat.id, processing.id, render_format_listing(&title, &formats))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

fn render_format_listing(title: &str, formats: &[DisplayFormat]) -> String {
    let mut text = format!("<b>Available formats for:</b> {}\n\n", escape_html(title));

    for (i, format) in formats.iter().take(config::keyboard::MAX_TEXT_FORMATS).enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, escape_html(&format.label)));
        text.push_str(&format!("   Format ID: <code>{}</code>\n\n", escape_html(&format.format_id)));
    }

    if formats.len() > config::keyboard::MAX_TEXT_FORMATS {
        text.push_str(&format!(
            "... and {} more formats\n",
            formats.len() - config::keyboard::MAX_TEXT_FORMATS
        ));
    }

    text.push_str("\nUse /ytdl <url> to download with interactive format selection.");
    text
}

/// Handle a format picker button press.
pub async fn handle_format_callback(bot: &Bot, q: CallbackQuery) -> Result<(), AppError> {
    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let (chat_id, message_id) = match q.message.as_ref() {
        Some(m) => (m.chat().id, m.id()),
        None => {
            bot.answer_callback_query(q.id.clone())
                .text("Message is no longer available")
                .show_alert(true)
                .await?;
            return Ok(());
        }
    };

    if data == CANCEL_DATA {
        PENDING.remove(chat_id.0, message_id.0);
        bot.answer_callback_query(q.id.clone()).await?;
        bot.edit_message_text(chat_id, message_id, "❌ Download cancelled.").await?;
        return Ok(());
    }

    let Some(format_id) = parse_callback(&data).map(|id| id.to_string()) else {
        bot.answer_callback_query(q.id.clone())
            .text("Invalid selection")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let Some(pending) = PENDING.get(chat_id.0, message_id.0) else {
        bot.answer_callback_query(q.id.clone())
            .text("Selection expired, send the link again")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let requester_id = i64::try_from(q.from.id.0).unwrap_or(0);
    if requester_id != pending.requested_by {
        bot.answer_callback_query(q.id.clone())
            .text("This download was requested by another user")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    bot.answer_callback_query(q.id.clone()).text("Starting download...").await?;
    bot.edit_message_text(
        chat_id,
        message_id,
        "⬇️ Starting download...\n\nThis may take a while depending on the video size and format.",
    )
    .await?;

    let dest_dir = config::download_root().join(requester_id.to_string());
    let requester_name = q.from.first_name.clone();

    match run_download_and_upload(
        bot,
        chat_id,
        message_id,
        &pending.url,
        &format_id,
        &pending.title,
        &requester_name,
        &dest_dir,
    )
    .await
    {
        Ok(()) => {
            PENDING.remove(chat_id.0, message_id.0);
            bot.edit_message_text(chat_id, message_id, "✅ Download completed successfully!")
                .await?;
        }
        Err(e) => {
            log::error!("Download failed for {}: {}", pending.url, e);
            bot.edit_message_text(chat_id, message_id, format!("❌ Download failed: {}", e.user_message()))
                .await?;
        }
    }

    cleanup_empty_dir(&dest_dir).await;

    Ok(())
}

/// Downloads the chosen format and uploads it to the chat.
#[allow(clippy::too_many_arguments)]
async fn run_download_and_upload(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    url: &url::Url,
    format_id: &str,
    title: &str,
    requester_name: &str,
    dest_dir: &Path,
) -> Result<(), AppError> {
    let file_path = download_media(url, format_id, dest_dir).await?;

    let file_size = tokio::fs::metadata(&file_path).await.map(|m| m.len()).unwrap_or(0);

    bot.edit_message_text(chat_id, message_id, "📤 Uploading to Telegram...")
        .await?;

    let caption = format!(
        "<b>{}</b>\n\n💾 Size: {}\n🎬 Format: {}\n👤 Requested by: {}",
        escape_html(title),
        human_readable_size(file_size),
        escape_html(format_id),
        escape_html(requester_name)
    );

    let upload_result = if is_video_file(&file_path) {
        bot.send_video(chat_id, InputFile::file(file_path.clone()))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
    } else {
        bot.send_audio(chat_id, InputFile::file(file_path.clone()))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
    };

    // The file is transient either way; remove it before reporting
    if let Err(e) = tokio::fs::remove_file(&file_path).await {
        log::warn!("Failed to remove downloaded file {}: {}", file_path.display(), e);
    }

    upload_result?;
    Ok(())
}

/// Removes the per-user download dir when nothing is left in it.
async fn cleanup_empty_dir(dir: &Path) {
    if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
        if let Ok(None) = entries.next_entry().await {
            let _ = tokio::fs::remove_dir(dir).await;
        }
    }
}
