//! # ircwatch Testkit
//!
//! Testing utilities for ircwatch.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A ready store plus sample networks and channels
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ircwatch_testkit::generators::NetworkParams;
//!
//! proptest! {
//!     #[test]
//!     fn network_reads_back_normalized(params: NetworkParams) {
//!         let network = params.build();
//!         prop_assert!(network.normalized().channels.is_empty());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ircwatch_testkit::fixtures::{oftc, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let network = oftc();
//! assert_eq!(network.port, 6697);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{oftc, TestFixture};
pub use generators::{ChannelParams, NetworkParams};
