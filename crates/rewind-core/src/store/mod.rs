//! Message store abstraction.
//!
//! [`MessageStore`] is the interface the rewinder reads and deletes through.
//! The default implementation is [`sqlite::SqliteStore`]; [`memory::MemoryStore`]
//! keeps everything in process for hosts without a database.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod memory;
pub mod sqlite;

use std::future::Future;

use crate::model::{ChatMessage, Position, StoredMessage};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait MessageStore: Send + Sync + 'static {
    /// Persist a message and return it with its assigned `seq`.
    fn append_message(
        &self,
        msg: &ChatMessage,
    ) -> impl Future<Output = Result<StoredMessage, sqlx::Error>> + Send;

    /// Up to `limit` messages from `sender_id` in the chat with
    /// `send_timestamp < before_timestamp`, most recent first.
    fn recent_messages_from(
        &self,
        chat_key: &str,
        sender_id: &str,
        before_timestamp: i64,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<StoredMessage>, sqlx::Error>> + Send;

    /// Messages positioned strictly after `after` whose `send_timestamp` is
    /// at most `up_to_timestamp`, oldest first.
    fn messages_between(
        &self,
        chat_key: &str,
        after: Position,
        up_to_timestamp: i64,
    ) -> impl Future<Output = Result<Vec<StoredMessage>, sqlx::Error>> + Send;

    /// Every message of the chat, oldest first.
    fn list_messages(
        &self,
        chat_key: &str,
    ) -> impl Future<Output = Result<Vec<StoredMessage>, sqlx::Error>> + Send;

    /// Delete one message. Returns `false` if no row had that `seq`.
    fn delete_message(&self, seq: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}
