//! Traceback rewinder.
//!
//! Rewinds a chat to the bot message before the latest bot turn:
//!
//! 1. Look up the two most recent bot messages sent before the command.
//! 2. With fewer than two there is no earlier checkpoint, so the whole chat
//!    log is cleared.
//! 3. Otherwise the older of the two is the checkpoint; every message after
//!    it, up to and including the command, is deleted.
//!
//! Two notices follow, both sent with `record = false`: the deletion result,
//! then the current state of the chat.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::RewindError;
use crate::model::StoredMessage;
use crate::notify::Notifier;
use crate::store::MessageStore;

/// Number of characters of the checkpoint message shown in the status notice.
pub const SUMMARY_CHARS: usize = 10;

/// What a rewind did to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewindOutcome {
    /// Fewer than two bot messages preceded the command; the log was emptied.
    Cleared { deleted: u64 },
    /// The log was cut back to `checkpoint`, which is kept.
    RewoundTo {
        deleted: u64,
        checkpoint: StoredMessage,
    },
}

impl RewindOutcome {
    pub fn deleted(&self) -> u64 {
        match self {
            Self::Cleared { deleted } | Self::RewoundTo { deleted, .. } => *deleted,
        }
    }

    /// First notice: how much was removed.
    pub fn result_notice(&self) -> String {
        match self {
            Self::Cleared { deleted } => format!("All {deleted} messages have been deleted"),
            Self::RewoundTo { deleted, .. } => format!(
                "Rewound to the previous bot message; {deleted} messages in between have been deleted"
            ),
        }
    }

    /// Second notice: what the chat looks like now.
    pub fn status_notice(&self) -> String {
        match self {
            Self::Cleared { .. } => "Current state\nWaiting for user message...".to_owned(),
            Self::RewoundTo { checkpoint, .. } => format!(
                "Current state\nBot message: {}\nWaiting for user message...",
                summarize(&checkpoint.content_text)
            ),
        }
    }
}

/// Shorten `text` to [`SUMMARY_CHARS`] characters, marking the cut with `...`.
pub fn summarize(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Deletes the tail of a chat log back to the previous bot turn.
#[derive(Debug)]
pub struct Rewinder<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    bot_sender_id: String,
}

impl<S: MessageStore, N: Notifier> Rewinder<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>, bot_sender_id: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            bot_sender_id: bot_sender_id.into(),
        }
    }

    /// Rewind `chat_key` relative to a command sent at `command_timestamp`.
    ///
    /// No locking is done here; the host must not run two rewinds of the same
    /// chat concurrently.
    pub async fn rewind(
        &self,
        chat_key: &str,
        command_timestamp: i64,
    ) -> Result<RewindOutcome, RewindError> {
        let mut bot_messages = self
            .store
            .recent_messages_from(chat_key, &self.bot_sender_id, command_timestamp, 2)
            .await?;
        debug!(chat_key, found = bot_messages.len(), "looked up prior bot messages");

        let outcome = if bot_messages.len() < 2 {
            let doomed = self.store.list_messages(chat_key).await?;
            let deleted = self.delete_each(chat_key, &doomed).await?;
            info!(chat_key, deleted, "traceback cleared the chat");
            RewindOutcome::Cleared { deleted }
        } else {
            // Most recent first: index 1 is the bot turn before the latest one.
            let checkpoint = bot_messages.swap_remove(1);
            let doomed = self
                .store
                .messages_between(chat_key, checkpoint.position(), command_timestamp)
                .await?;
            let deleted = self.delete_each(chat_key, &doomed).await?;
            info!(
                chat_key,
                deleted,
                checkpoint_seq = checkpoint.seq,
                checkpoint_ts = checkpoint.send_timestamp,
                "traceback rewound the chat"
            );
            RewindOutcome::RewoundTo { deleted, checkpoint }
        };

        self.notifier
            .send_text(chat_key, &outcome.result_notice(), false)
            .await?;
        self.notifier
            .send_text(chat_key, &outcome.status_notice(), false)
            .await?;
        Ok(outcome)
    }

    async fn delete_each(&self, chat_key: &str, doomed: &[StoredMessage]) -> Result<u64, RewindError> {
        let mut deleted = 0;
        for msg in doomed {
            match self.store.delete_message(msg.seq).await {
                Ok(true) => deleted += 1,
                Ok(false) => debug!(chat_key, seq = msg.seq, "message already gone"),
                Err(e) => {
                    warn!(chat_key, seq = msg.seq, deleted, error = %e, "delete failed mid-rewind");
                    return Err(e.into());
                }
            }
        }
        Ok(deleted)
    }
}
