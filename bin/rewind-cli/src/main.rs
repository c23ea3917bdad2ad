//! rewind – command-line host for the message traceback plugin.
//!
//! Startup order:
//! 1. Parse configuration from environment variables and CLI flags.
//! 2. Initialise structured tracing (JSON or pretty).
//! 3. Open the SQLite message log and run pending migrations.
//! 4. Run the requested subcommand.

mod cli;
mod config;
mod notifier;

use std::io::Stdout;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use rewind_core::{ChatMessage, MessageStore, Notifier, SqliteStore, TracebackPlugin, MANIFEST};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::notifier::ConsoleNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let args = Cli::parse();
    let mut cfg = Config::from_env();
    if let Some(url) = args.database_url.clone() {
        cfg.database_url = url;
    }

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    init_tracing(&cfg);

    if let Commands::Manifest = args.command {
        println!("{}", serde_json::to_string_pretty(&MANIFEST)?);
        return Ok(());
    }

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = Arc::new(
        SqliteStore::connect(&cfg.database_url)
            .await
            .with_context(|| format!("failed to open {}", cfg.database_url))?,
    );
    info!(database_url = %cfg.database_url, "database ready");

    let notifier = Arc::new(ConsoleNotifier::new(
        Arc::clone(&store),
        cfg.bot_sender_id.clone(),
        std::io::stdout(),
    ));

    // ── 4. Subcommand ──────────────────────────────────────────────────────────
    match args.command {
        Commands::Say {
            chat,
            sender,
            timestamp,
            text,
        } => {
            let msg = ChatMessage::new(
                chat,
                sender,
                timestamp.unwrap_or_else(|| Utc::now().timestamp()),
                text.join(" "),
            );
            say(&cfg, store, notifier, msg).await?;
        }
        Commands::Bot { chat, text } => {
            notifier.send_text(&chat, &text.join(" "), true).await?;
        }
        Commands::History { chat } => {
            for msg in store.list_messages(&chat).await? {
                println!(
                    "#{:<5} t={:<12} {:>8}: {}",
                    msg.seq, msg.send_timestamp, msg.sender_id, msg.content_text
                );
            }
        }
        Commands::Manifest => {}
    }

    Ok(())
}

/// Persist a user message, then hand it to the plugin the way a chat host would.
async fn say(
    cfg: &Config,
    store: Arc<SqliteStore>,
    notifier: Arc<ConsoleNotifier<SqliteStore, Stdout>>,
    msg: ChatMessage,
) -> anyhow::Result<()> {
    let stored = store.append_message(&msg).await?;
    info!(chat_key = %msg.chat_key, seq = stored.seq, "message recorded");

    if msg.sender_id == cfg.bot_sender_id {
        return Ok(());
    }

    let plugin = TracebackPlugin::new(store, notifier, cfg.plugin());
    let signal = plugin.on_user_message(&msg).await;
    info!(%signal, "plugin finished");
    Ok(())
}

fn init_tracing(cfg: &Config) {
    // Build the log-level filter, warning loudly if the configured value is
    // not a valid tracing filter expression.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: REWIND_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    // Logs go to stderr so notices on stdout stay readable.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
