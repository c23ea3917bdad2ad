//! Message traceback plugin.
//!
//! Watches user messages for `/traceback` (alias `/tb`) and rewinds the chat
//! log to the bot turn before the latest one.
//!
//! The host supplies a [`MessageStore`] holding the chat log and a
//! [`Notifier`] for replies, then feeds every user message through
//! [`TracebackPlugin::on_user_message`].

pub mod command;
pub mod error;
pub mod model;
pub mod notify;
pub mod plugin;
pub mod rewind;
pub mod store;

pub use command::{Command, MsgSignal, ParsedCommand, COMMAND_TABLE};
pub use error::RewindError;
pub use model::{ChatMessage, Position, StoredMessage, DEFAULT_BOT_SENDER_ID};
pub use notify::{MemoryNotifier, Notifier, NotifyError, SentNotice};
pub use plugin::{PluginConfig, PluginManifest, TracebackPlugin, MANIFEST};
pub use rewind::{summarize, RewindOutcome, Rewinder};
pub use store::{MemoryStore, MessageStore, SqliteStore};
