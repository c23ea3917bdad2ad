//! In-process [`MessageStore`] backed by a mutex-guarded vector.

use std::sync::{Mutex, MutexGuard};

use super::MessageStore;
use crate::model::{ChatMessage, Position, StoredMessage};

#[derive(Debug, Default)]
struct Inner {
    next_seq: i64,
    messages: Vec<StoredMessage>,
}

/// Message log held in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, sqlx::Error> {
        self.inner
            .lock()
            .map_err(|_| sqlx::Error::Protocol("memory store lock poisoned".to_owned()))
    }

    /// Messages of `chat_key` matching `keep`, sorted by position.
    fn select(
        &self,
        chat_key: &str,
        keep: impl Fn(&StoredMessage) -> bool,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        let inner = self.lock()?;
        let mut out: Vec<StoredMessage> = inner
            .messages
            .iter()
            .filter(|m| m.chat_key == chat_key && keep(m))
            .cloned()
            .collect();
        out.sort_by_key(StoredMessage::position);
        Ok(out)
    }
}

impl MessageStore for MemoryStore {
    async fn append_message(&self, msg: &ChatMessage) -> Result<StoredMessage, sqlx::Error> {
        let mut inner = self.lock()?;
        inner.next_seq += 1;
        let stored = StoredMessage {
            seq: inner.next_seq,
            chat_key: msg.chat_key.clone(),
            sender_id: msg.sender_id.clone(),
            send_timestamp: msg.send_timestamp,
            content_text: msg.content_text.clone(),
        };
        inner.messages.push(stored.clone());
        Ok(stored)
    }

    async fn recent_messages_from(
        &self,
        chat_key: &str,
        sender_id: &str,
        before_timestamp: i64,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        let mut found = self.select(chat_key, |m| {
            m.sender_id == sender_id && m.send_timestamp < before_timestamp
        })?;
        found.reverse();
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn messages_between(
        &self,
        chat_key: &str,
        after: Position,
        up_to_timestamp: i64,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        self.select(chat_key, |m| {
            m.position() > after && m.send_timestamp <= up_to_timestamp
        })
    }

    async fn list_messages(&self, chat_key: &str) -> Result<Vec<StoredMessage>, sqlx::Error> {
        self.select(chat_key, |_| true)
    }

    async fn delete_message(&self, seq: i64) -> Result<bool, sqlx::Error> {
        let mut inner = self.lock()?;
        let before = inner.messages.len();
        inner.messages.retain(|m| m.seq != seq);
        Ok(inner.messages.len() < before)
    }
}
