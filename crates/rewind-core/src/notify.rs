//! Outbound "send text to chat" channel.

use std::future::Future;
use std::sync::Mutex;

use thiserror::Error;

/// Failures while delivering a notice to a chat.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording the sent text into the chat log failed.
    #[error("failed to record notice: {0}")]
    Store(#[from] sqlx::Error),

    /// The outbound channel is no longer accepting messages.
    #[error("notification channel closed: {0}")]
    Closed(String),
}

pub trait Notifier: Send + Sync + 'static {
    /// Deliver `message` to the chat. With `record == false` the text must not
    /// be written back into the chat's own history.
    fn send_text(
        &self,
        chat_key: &str,
        message: &str,
        record: bool,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// A notice captured by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotice {
    pub chat_key: String,
    pub message: String,
    pub record: bool,
}

/// Notifier that keeps every notice in memory, in send order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<SentNotice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<SentNotice> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    async fn send_text(&self, chat_key: &str, message: &str, record: bool) -> Result<(), NotifyError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| NotifyError::Closed("notice buffer poisoned".to_owned()))?;
        sent.push(SentNotice {
            chat_key: chat_key.to_owned(),
            message: message.to_owned(),
            record,
        });
        Ok(())
    }
}
