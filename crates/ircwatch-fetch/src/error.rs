//! Error types for the fetcher.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed: connect failure, timeout, or a
    /// body that stopped mid-transfer.
    #[error("unreachable: {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("bad status {code} from {url}")]
    BadStatus { url: String, code: u16 },

    /// The local destination could not be created or written.
    #[error("local I/O error at {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request itself is malformed (bad URL or header).
    #[error("invalid request for {url}: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether trying again later might succeed.
    ///
    /// Network failures, 5xx responses and 429 are retryable; local I/O
    /// failures and other statuses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Unreachable { .. } => true,
            FetchError::BadStatus { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    pub(crate) fn local_io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| FetchError::LocalIo { path, source }
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_builder() {
            FetchError::InvalidRequest {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::Unreachable {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
