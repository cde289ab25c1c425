//! Strong identity types.
//!
//! Identities are storage-assigned integers. `0` is the "unpersisted"
//! sentinel; a value becomes non-zero exactly once, on first insert.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// The sentinel for an entity that has not been persisted yet.
            pub const UNSET: Self = Self(0);

            /// Create from a raw storage identity.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw storage identity.
            pub const fn get(&self) -> i64 {
                self.0
            }

            /// Whether this is the unpersisted sentinel.
            pub const fn is_unset(&self) -> bool {
                self.0 == 0
            }

            /// Replace the sentinel with a storage-assigned identity.
            ///
            /// Reassigning the same value is a no-op; anything else fails.
            pub fn assign(&mut self, id: Self) -> Result<()> {
                if id.is_unset() {
                    return Err(CoreError::UnsetIdentity);
                }
                if !self.is_unset() && *self != id {
                    return Err(CoreError::IdentityAlreadyAssigned {
                        current: self.0,
                        attempted: id.0,
                    });
                }
                *self = id;
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

identity!(
    /// Identity of a persisted [`Network`](crate::Network).
    NetworkId
);

identity!(
    /// Identity of a persisted [`Channel`](crate::Channel).
    ChannelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert!(NetworkId::default().is_unset());
        assert_eq!(ChannelId::default(), ChannelId::UNSET);
    }

    #[test]
    fn test_assign_once() {
        let mut id = NetworkId::UNSET;
        id.assign(NetworkId::new(7)).unwrap();
        assert_eq!(id.get(), 7);

        // Same value again is fine
        id.assign(NetworkId::new(7)).unwrap();

        let err = id.assign(NetworkId::new(8)).unwrap_err();
        assert_eq!(
            err,
            CoreError::IdentityAlreadyAssigned {
                current: 7,
                attempted: 8
            }
        );
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn test_assign_unset_rejected() {
        let mut id = ChannelId::UNSET;
        assert_eq!(id.assign(ChannelId::UNSET), Err(CoreError::UnsetIdentity));
    }

    #[test]
    fn test_display_and_debug() {
        let id = ChannelId::new(42);
        assert_eq!(format!("{}", id), "42");
        assert_eq!(format!("{:?}", id), "ChannelId(42)");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&NetworkId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
