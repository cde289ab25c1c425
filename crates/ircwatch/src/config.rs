//! Configuration for an [`Ircwatch`](crate::Ircwatch) instance.
//!
//! Every section has defaults, so a partial document deserializes.

use std::path::PathBuf;

use ircwatch_fetch::FetcherConfig;
use serde::{Deserialize, Serialize};

/// Where configuration state is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. `None` keeps everything in memory.
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings.
    pub database: DatabaseConfig,
    /// Fetcher settings.
    pub fetch: FetcherConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_in_memory() {
        let config = Config::default();
        assert_eq!(config.database.path, None);
        assert!(config.fetch.dest_dir.ends_with("ircwatch-fetch"));
    }

    #[test]
    fn test_partial_document() {
        let config: Config = serde_json::from_str(
            r#"{"database": {"path": "/var/lib/ircwatch/ircwatch.db"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/var/lib/ircwatch/ircwatch.db"))
        );
        assert_eq!(config.fetch, FetcherConfig::default());
    }
}
