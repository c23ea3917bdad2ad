//! CLI configuration, loaded from environment variables at startup.

use rewind_core::{PluginConfig, DEFAULT_BOT_SENDER_ID};

/// Runtime configuration for the `rewind` host.
///
/// Every field has a default so the tool works without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL (default: `"sqlite://rewind.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Sender id of the bot in the message log.
    pub bot_sender_id: String,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: env_or("REWIND_DATABASE_URL", "sqlite://rewind.db"),
            log_level: env_or("REWIND_LOG", "info"),
            log_json: std::env::var("REWIND_LOG_JSON")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            bot_sender_id: env_or("REWIND_BOT_SENDER_ID", DEFAULT_BOT_SENDER_ID),
        }
    }

    pub fn plugin(&self) -> PluginConfig {
        PluginConfig {
            bot_sender_id: self.bot_sender_id.clone(),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
