//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rewind", version, about = "Chat log host for the message traceback plugin")]
pub struct Cli {
    /// Overrides `REWIND_DATABASE_URL`.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a message from a user and run it through the plugin.
    Say {
        #[arg(long)]
        chat: String,
        #[arg(long, default_value = "10000")]
        sender: String,
        /// Send time in seconds since the epoch; defaults to now.
        #[arg(long)]
        timestamp: Option<i64>,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Record a bot reply in the chat log.
    Bot {
        #[arg(long)]
        chat: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print a chat's message log, oldest first.
    History {
        #[arg(long)]
        chat: String,
    },
    /// Print the plugin manifest as JSON.
    Manifest,
}
