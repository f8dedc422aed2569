//! Bot initialization and command definitions.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::User;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::telegram::handlers::schema;
use crate::telegram::Bot;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show usage")]
    Start,
    #[command(description = "fetch a video and pick a format to download")]
    Ytdl(String),
    #[command(description = "list available formats for a URL")]
    YtdlFormat(String),
}

/// Creates a Bot instance with a timeout-configured HTTP client.
///
/// Uploads over the Bot API can take a while, so the client timeout is
/// far above reqwest's default.
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.clone();
    if token.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Whether a user may run download commands.
///
/// OWNER_ID = 0 disables the restriction entirely.
pub fn is_authorized(user: Option<&User>) -> bool {
    let owner = *config::OWNER_ID;
    if owner == 0 {
        return true;
    }
    user.and_then(|u| i64::try_from(u.id.0).ok()) == Some(owner)
}

/// Creates the bot and runs the dispatcher until shutdown.
pub async fn run_bot() -> anyhow::Result<()> {
    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    log::info!("Starting Telegram bot...");
    Dispatcher::builder(bot, schema())
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
