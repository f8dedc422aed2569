use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tuberelay")]
#[command(author, version, about = "HTTP API and Telegram bot for fetching and relaying media via yt-dlp", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run both front-ends (HTTP API + Telegram bot)
    Run,

    /// Run the HTTP API only
    Serve {
        /// Port to bind (overrides HTTP_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the Telegram bot only
    Bot,

    /// Print metadata for a URL
    Info {
        /// Media URL
        url: String,

        /// Print the raw yt-dlp JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Print the available formats for a URL
    Formats {
        /// Media URL
        url: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
