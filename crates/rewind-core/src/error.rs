//! Errors raised while running a plugin command.
//!
//! Store and notification failures are not classified any further; the
//! dispatcher logs them and drops the turn.

use thiserror::Error;

use crate::notify::NotifyError;

#[derive(Debug, Error)]
pub enum RewindError {
    /// Propagated from the SQLite (or other) message store.
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Sending a status notice back to the chat failed.
    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),
}
