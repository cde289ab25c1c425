//! # ircwatch Core
//!
//! Pure domain types for ircwatch: the networks it monitors and the channels
//! configured on each of them.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Network`] - A configured chat-server endpoint
//! - [`Channel`] - A room within a network
//! - [`NetworkId`] / [`ChannelId`] - Storage identities, `0` meaning "not yet persisted"
//! - [`NickServ`] - Registered-identity credentials for a network
//!
//! ## Optional Fields
//!
//! Passwords, the invite command and NickServ credentials are `Option`s in
//! the domain. Storage encodes them as nullable columns and treats an empty
//! string as absent, see [`normalize_optional`].

pub mod channel;
pub mod error;
pub mod network;
pub mod optional;
pub mod types;

pub use channel::Channel;
pub use error::{CoreError, Result};
pub use network::{Network, NickServ};
pub use optional::normalize_optional;
pub use types::{ChannelId, NetworkId};
