//! # ircwatch Fetch
//!
//! Downloads a remote resource to a local file whose name is derived from
//! the URL, so the same URL always lands on the same path.
//!
//! ## Key Types
//!
//! - [`Fetcher`] - Performs downloads with a fixed timeout
//! - [`FetcherConfig`] - Destination directory and user agent
//! - [`FetchOptions`] / [`RetryPolicy`] - Per-call headers and retry behaviour
//! - [`Fetched`] - The downloaded file, owned by the caller
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ircwatch_fetch::{FetchOptions, Fetcher, FetcherConfig};
//!
//! async fn example() {
//!     let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
//!     if let Some(fetched) = fetcher
//!         .fetch("https://example.org/list.txt", &FetchOptions::default())
//!         .await
//!         .unwrap()
//!     {
//!         println!("saved to {}", fetched.path.display());
//!         fetched.remove().await.unwrap();
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No caching**: every call downloads again, even though the path is stable.
//! - **No stray files**: the destination is removed on any failure, including
//!   when the caller drops the future before it completes.
//! - **Empty URL**: returns `Ok(None)` without touching the network.

pub mod config;
pub mod error;
pub mod fetcher;

pub use config::{FetchOptions, FetcherConfig, RetryPolicy};
pub use error::{FetchError, Result};
pub use fetcher::{Fetched, Fetcher, FETCH_TIMEOUT};
