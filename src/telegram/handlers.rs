//! Dispatcher schema for the bot.

use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::telegram::bot::Command;
use crate::telegram::downloads;
use crate::telegram::Bot;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Cached regex for matching URLs in free-form messages
static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("Failed to compile URL regex"));

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same handler tree is used in production and in integration
/// tests.
pub fn schema() -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(command_handler())
        .branch(url_message_handler())
        .branch(callback_handler())
}

/// Handler for bot commands (/start, /ytdl, /ytdl_format)
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(|bot: Bot, msg: Message, cmd: Command| async move {
            let result = match cmd {
                Command::Start => downloads::handle_start(&bot, &msg).await,
                Command::Ytdl(args) => downloads::handle_ytdl(&bot, &msg, args.trim()).await,
                Command::YtdlFormat(args) => downloads::handle_ytdl_format(&bot, &msg, args.trim()).await,
            };

            if let Err(e) = result {
                log::error!("Command handler failed for chat {}: {}", msg.chat.id, e);
                let _ = bot
                    .send_message(msg.chat.id, format!("❌ Error: {}", e.user_message()))
                    .await;
            }
            Ok(())
        })
}

/// Handler for plain messages containing a URL.
///
/// A bare link behaves like /ytdl <url>.
fn url_message_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|text| URL_REGEX.is_match(text)))
        .endpoint(|bot: Bot, msg: Message| async move {
            let text = msg.text().unwrap_or_default().to_string();
            let Some(found) = URL_REGEX.find(&text) else {
                return Ok(());
            };

            if let Err(e) = downloads::handle_ytdl(&bot, &msg, found.as_str()).await {
                log::error!("URL message handler failed for chat {}: {}", msg.chat.id, e);
                let _ = bot
                    .send_message(msg.chat.id, format!("❌ Error: {}", e.user_message()))
                    .await;
            }
            Ok(())
        })
}

/// Handler for callback queries (format picker buttons)
fn callback_handler() -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(|bot: Bot, q: CallbackQuery| async move {
        if let Err(e) = downloads::handle_format_callback(&bot, q).await {
            log::error!("Callback handler failed: {}", e);
        }
        Ok(())
    })
}
