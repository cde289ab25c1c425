//! Error types for ircwatch core.

use thiserror::Error;

/// Errors raised by domain-level invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An identity was already assigned and cannot be replaced.
    #[error("identity already assigned: current {current}, attempted {attempted}")]
    IdentityAlreadyAssigned { current: i64, attempted: i64 },

    /// The sentinel value cannot be assigned as a real identity.
    #[error("cannot assign the unset identity")]
    UnsetIdentity,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
