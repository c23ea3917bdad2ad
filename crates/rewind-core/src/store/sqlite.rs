//! SQLite implementation of [`MessageStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature.  Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! `sqlx::migrate!("./migrations")` resolves the path at compile time
//! relative to this crate's `Cargo.toml`, so the SQL is embedded into the
//! binary.  The database file location is chosen at runtime.
//!
//! The runtime-checked `sqlx::query` form is used so that no `DATABASE_URL`
//! is needed at compile time.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::MessageStore;
use crate::model::{ChatMessage, Position, StoredMessage};

/// SQLite-backed chat message log.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://rewind.db"`
    /// or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // Every connection to an in-memory database gets its own empty
        // database, so pin the pool to one connection.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

impl MessageStore for SqliteStore {
    async fn append_message(&self, msg: &ChatMessage) -> Result<StoredMessage, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO chat_messages (chat_key, sender_id, send_timestamp, content_text) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&msg.chat_key)
        .bind(&msg.sender_id)
        .bind(msg.send_timestamp)
        .bind(&msg.content_text)
        .execute(&self.pool)
        .await?;
        Ok(StoredMessage {
            seq: result.last_insert_rowid(),
            chat_key: msg.chat_key.clone(),
            sender_id: msg.sender_id.clone(),
            send_timestamp: msg.send_timestamp,
            content_text: msg.content_text.clone(),
        })
    }

    async fn recent_messages_from(
        &self,
        chat_key: &str,
        sender_id: &str,
        before_timestamp: i64,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        sqlx::query_as(
            "SELECT seq, chat_key, sender_id, send_timestamp, content_text FROM chat_messages \
             WHERE chat_key = ?1 AND sender_id = ?2 AND send_timestamp < ?3 \
             ORDER BY send_timestamp DESC, seq DESC LIMIT ?4",
        )
        .bind(chat_key)
        .bind(sender_id)
        .bind(before_timestamp)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
    }

    async fn messages_between(
        &self,
        chat_key: &str,
        after: Position,
        up_to_timestamp: i64,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        sqlx::query_as(
            "SELECT seq, chat_key, sender_id, send_timestamp, content_text FROM chat_messages \
             WHERE chat_key = ?1 \
               AND (send_timestamp > ?2 OR (send_timestamp = ?2 AND seq > ?3)) \
               AND send_timestamp <= ?4 \
             ORDER BY send_timestamp ASC, seq ASC",
        )
        .bind(chat_key)
        .bind(after.send_timestamp)
        .bind(after.seq)
        .bind(up_to_timestamp)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_messages(&self, chat_key: &str) -> Result<Vec<StoredMessage>, sqlx::Error> {
        sqlx::query_as(
            "SELECT seq, chat_key, sender_id, send_timestamp, content_text FROM chat_messages \
             WHERE chat_key = ?1 \
             ORDER BY send_timestamp ASC, seq ASC",
        )
        .bind(chat_key)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_message(&self, seq: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE seq = ?1")
            .bind(seq)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
