//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use ircwatch_core::{Channel, Network, NetworkId};
use ircwatch_store::{ChannelStore, MemoryStore, NetworkStore, Result};

/// The OFTC network over TLS, unpersisted and without channels.
pub fn oftc() -> Network {
    Network::new("OFTC", "irc.oftc.net", 6697).tls(true)
}

/// A test fixture with an in-memory store.
pub struct TestFixture {
    pub store: MemoryStore,
}

impl TestFixture {
    /// Create a fixture with an empty store.
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Persist a plaintext network named `name`.
    pub async fn make_network(&self, name: &str) -> Result<Network> {
        let mut network = Network::new(name, format!("irc.{}.example", name.to_lowercase()), 6667);
        self.store.upsert_network(&mut network).await?;
        Ok(network)
    }

    /// Persist a channel under `network_id`.
    pub async fn make_channel(&self, network_id: NetworkId, name: &str) -> Result<Channel> {
        let mut channel = Channel::new(name);
        self.store.upsert_channel(network_id, &mut channel).await?;
        Ok(channel)
    }

    /// Persist `oftc()` with one channel per name.
    pub async fn make_oftc(&self, channels: &[&str]) -> Result<Network> {
        let mut network = oftc();
        self.store.upsert_network(&mut network).await?;
        for name in channels {
            let channel = self.make_channel(network.id, name).await?;
            network.channels.push(channel);
        }
        Ok(network)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
