//! Error types for ircwatch.

use ircwatch_fetch::FetchError;
use ircwatch_store::StoreError;
use thiserror::Error;

/// Errors that can occur during ircwatch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Result type for ircwatch operations.
pub type Result<T> = std::result::Result<T, Error>;
