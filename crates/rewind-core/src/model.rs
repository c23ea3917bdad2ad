//! Chat message types shared by the store, the rewinder and the dispatcher.

use serde::{Deserialize, Serialize};

/// Sender id the host assigns to messages authored by the bot itself.
pub const DEFAULT_BOT_SENDER_ID: &str = "-1";

/// A message as handed to the plugin by the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub chat_key: String,
    pub sender_id: String,
    /// Send time in seconds; orders messages within a chat.
    pub send_timestamp: i64,
    pub content_text: String,
}

impl ChatMessage {
    pub fn new(
        chat_key: impl Into<String>,
        sender_id: impl Into<String>,
        send_timestamp: i64,
        content_text: impl Into<String>,
    ) -> Self {
        Self {
            chat_key: chat_key.into(),
            sender_id: sender_id.into(),
            send_timestamp,
            content_text: content_text.into(),
        }
    }
}

/// A single row in the `chat_messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredMessage {
    /// Store-assigned key, strictly increasing in insertion order.
    pub seq: i64,
    pub chat_key: String,
    /// [`DEFAULT_BOT_SENDER_ID`] (or the configured override) for bot messages.
    pub sender_id: String,
    pub send_timestamp: i64,
    pub content_text: String,
}

impl StoredMessage {
    pub fn position(&self) -> Position {
        Position {
            send_timestamp: self.send_timestamp,
            seq: self.seq,
        }
    }
}

/// Location of a message in its chat's log.
///
/// Ordered by `send_timestamp` first and `seq` second, so two messages that
/// share a timestamp still have a well-defined order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub send_timestamp: i64,
    pub seq: i64,
}
