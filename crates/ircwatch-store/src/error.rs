//! Error types for the store module.

use ircwatch_core::{ChannelId, CoreError, NetworkId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No network with this identity.
    #[error("network not found: {0}")]
    NetworkNotFound(NetworkId),

    /// No channel with this identity.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// Domain invariant violated.
    #[error("invalid entity: {0}")]
    Core(#[from] CoreError),

    /// The caller dropped the operation before it ran to completion.
    #[error("operation cancelled")]
    Cancelled,

    /// The connection mutex was poisoned by a panicking holder.
    #[error("connection poisoned: {0}")]
    Poisoned(String),

    /// The blocking worker failed to run the operation.
    #[error("blocking task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NetworkNotFound(_) | StoreError::ChannelNotFound(_)
        )
    }

    /// Whether the operation was aborted on behalf of the caller.
    pub fn is_cancelled(&self) -> bool {
        match self {
            StoreError::Cancelled => true,
            StoreError::Database(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::OperationInterrupted
            }
            _ => false,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
