//! Notifier that prints replies to a terminal.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rewind_core::{ChatMessage, MessageStore, Notifier, NotifyError};
use tracing::debug;

/// Writes each notice as `[chat_key] text` and, when asked to record,
/// appends it to the chat log as a bot message.
#[derive(Debug)]
pub struct ConsoleNotifier<S, W> {
    store: Arc<S>,
    bot_sender_id: String,
    out: Mutex<W>,
}

impl<S, W> ConsoleNotifier<S, W> {
    pub fn new(store: Arc<S>, bot_sender_id: impl Into<String>, out: W) -> Self {
        Self {
            store,
            bot_sender_id: bot_sender_id.into(),
            out: Mutex::new(out),
        }
    }
}

impl<S, W> Notifier for ConsoleNotifier<S, W>
where
    S: MessageStore,
    W: Write + Send + 'static,
{
    async fn send_text(&self, chat_key: &str, message: &str, record: bool) -> Result<(), NotifyError> {
        {
            let mut out = self
                .out
                .lock()
                .map_err(|_| NotifyError::Closed("console writer poisoned".to_owned()))?;
            for line in message.lines() {
                writeln!(out, "[{chat_key}] {line}")?;
            }
            out.flush()?;
        }

        if record {
            let stored = self
                .store
                .append_message(&ChatMessage::new(
                    chat_key,
                    self.bot_sender_id.as_str(),
                    Utc::now().timestamp(),
                    message,
                ))
                .await?;
            debug!(chat_key, seq = stored.seq, "recorded bot message");
        }
        Ok(())
    }
}
