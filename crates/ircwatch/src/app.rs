//! The composition root: one store and one fetcher, built at startup.

use std::sync::Arc;

use ircwatch_core::{Network, NetworkId};
use ircwatch_fetch::{FetchOptions, Fetched, Fetcher};
use ircwatch_store::{ChannelStore, NetworkStore, NetworkStoreExt, SqliteStore};

use crate::config::Config;
use crate::error::Result;

/// Holds the store and fetcher for the lifetime of the process.
///
/// Construct once and pass it (or clones of it) to consumers explicitly.
pub struct Ircwatch<S: NetworkStore + ChannelStore = SqliteStore> {
    /// The storage backend.
    store: Arc<S>,
    /// The resource fetcher.
    fetcher: Fetcher,
}

impl<S: NetworkStore + ChannelStore> Clone for Ircwatch<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl Ircwatch<SqliteStore> {
    /// Open the SQLite store and build the fetcher described by `config`.
    pub fn open(config: Config) -> Result<Self> {
        let store = match &config.database.path {
            Some(path) => SqliteStore::open(path)?,
            None => {
                tracing::info!("no database path configured, using in-memory store");
                SqliteStore::open_memory()?
            }
        };
        let fetcher = Fetcher::new(config.fetch)?;
        Ok(Self::new(store, fetcher))
    }
}

impl<S: NetworkStore + ChannelStore> Ircwatch<S> {
    /// Assemble from an existing store and fetcher.
    pub fn new(store: S, fetcher: Fetcher) -> Self {
        Self {
            store: Arc::new(store),
            fetcher,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the fetcher reference.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Persist a network and all of its channels.
    pub async fn save_network(&self, network: &mut Network) -> Result<()> {
        self.store.save_network_with_channels(network).await?;
        Ok(())
    }

    /// Load a network with its channel list filled in.
    pub async fn load_network(&self, id: NetworkId) -> Result<Network> {
        let mut network = self.store.get_network(id).await?;
        network.channels = self.store.list_channels(id).await?;
        Ok(network)
    }

    /// Download `url` with the configured fetcher.
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Option<Fetched>> {
        Ok(self.fetcher.fetch(url, options).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ircwatch_core::Channel;
    use ircwatch_fetch::FetcherConfig;
    use ircwatch_store::MemoryStore;

    #[tokio::test]
    async fn test_memory_backed_app() {
        let fetcher = Fetcher::new(FetcherConfig::default()).unwrap();
        let app = Ircwatch::new(MemoryStore::new(), fetcher);

        let mut net = Network::new("OFTC", "irc.oftc.net", 6697).channel(Channel::new("#test"));
        app.save_network(&mut net).await.unwrap();

        let loaded = app.load_network(net.id).await.unwrap();
        assert_eq!(loaded.channels.len(), 1);
        assert_eq!(loaded.channels[0].name, "#test");
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let app = Ircwatch::open(Config::default()).unwrap();
        let other = app.clone();

        let mut net = Network::new("OFTC", "irc.oftc.net", 6697);
        app.store().upsert_network(&mut net).await.unwrap();

        assert_eq!(other.store().list_networks().await.unwrap().len(), 1);
    }
}
