//! # ircwatch Store
//!
//! Persistence for ircwatch configuration: networks and the channels
//! configured on them. Provides a trait-based interface with SQLite and
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`NetworkStore`] - Network lookup, listing, upsert and cascading delete
//! - [`ChannelStore`] - Channel listing and upsert, scoped to a network
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ircwatch_core::{Channel, Network};
//! use ircwatch_store::{ChannelStore, NetworkStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("ircwatch.db").unwrap();
//!
//!     let mut network = Network::new("OFTC", "irc.oftc.net", 6697).tls(true);
//!     store.upsert_network(&mut network).await.unwrap();
//!
//!     let mut channel = Channel::new("#test");
//!     store.upsert_channel(network.id, &mut channel).await.unwrap();
//!
//!     store.delete_network(network.id).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Sentinel identities**: `0` means "insert"; anything else means "overwrite".
//! - **Detached on insert**: new channels are always stored detached.
//! - **Lossy optionals**: empty optional strings are stored as NULL and read
//!   back as `None`.
//! - **Cancellation**: dropping an operation's future aborts it; a cancelled
//!   delete rolls back completely.

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChannelStore, NetworkStore, NetworkStoreExt};

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
