//! # ircwatch
//!
//! The unified API for ircwatch configuration state: the networks to
//! monitor, the channels on each network, and a helper that downloads
//! remote resources to local disk.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ircwatch::{Config, Ircwatch};
//! use ircwatch::core::{Channel, Network};
//! use ircwatch::store::{ChannelStore, NetworkStore};
//!
//! async fn example() {
//!     // Built once at startup and passed to whoever needs it.
//!     let app = Ircwatch::open(Config::default()).unwrap();
//!
//!     let mut network = Network::new("OFTC", "irc.oftc.net", 6697).tls(true);
//!     app.store().upsert_network(&mut network).await.unwrap();
//!
//!     let mut channel = Channel::new("#test");
//!     app.store().upsert_channel(network.id, &mut channel).await.unwrap();
//!
//!     app.store().delete_network(network.id).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ircwatch::core` - Domain types (Network, Channel, identities)
//! - `ircwatch::store` - Storage traits, SQLite and in-memory stores
//! - `ircwatch::fetch` - Resource fetcher

pub mod app;
pub mod config;
pub mod error;

// Re-export component crates
pub use ircwatch_core as core;
pub use ircwatch_fetch as fetch;
pub use ircwatch_store as store;

// Re-export main types for convenience
pub use app::Ircwatch;
pub use config::{Config, DatabaseConfig};
pub use error::{Error, Result};

// Re-export commonly used types
pub use ircwatch_core::{Channel, ChannelId, Network, NetworkId, NickServ};
pub use ircwatch_fetch::{FetchOptions, Fetched, Fetcher, FetcherConfig, RetryPolicy};
pub use ircwatch_store::{ChannelStore, NetworkStore, NetworkStoreExt, SqliteStore};
