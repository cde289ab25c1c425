//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use ircwatch_core::{Channel, ChannelId, Network, NetworkId};

use crate::error::{Result, StoreError};
use crate::now_millis;
use crate::traits::{ChannelStore, NetworkStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Networks indexed by ID. Ascending IDs double as insertion order.
    networks: BTreeMap<NetworkId, StoredNetwork>,

    /// Channels indexed by ID.
    channels: BTreeMap<ChannelId, Channel>,

    /// Last issued network ID. Never reused.
    last_network_id: i64,

    /// Last issued channel ID. Never reused.
    last_channel_id: i64,
}

struct StoredNetwork {
    network: Network,
    updated_at: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Last modification time of a network, in Unix ms.
    pub fn network_updated_at(&self, id: NetworkId) -> Result<i64> {
        let inner = self.read()?;
        inner
            .networks
            .get(&id)
            .map(|stored| stored.updated_at)
            .ok_or(StoreError::NetworkNotFound(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The value as SQLite would hand it back.
fn stored_network(network: &Network, id: NetworkId) -> Network {
    let mut stored = network.normalized();
    stored.id = id;
    stored
}

impl MemoryStoreInner {
    fn channels_of(&self, network_id: NetworkId) -> Vec<Channel> {
        self.channels
            .values()
            .filter(|c| c.network_id == network_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NetworkStore for MemoryStore {
    async fn get_network(&self, id: NetworkId) -> Result<Network> {
        let inner = self.read()?;
        inner
            .networks
            .get(&id)
            .map(|stored| stored.network.clone())
            .ok_or(StoreError::NetworkNotFound(id))
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        let inner = self.read()?;
        Ok(inner
            .networks
            .values()
            .map(|stored| stored.network.clone())
            .collect())
    }

    async fn list_channels(&self, network_id: NetworkId) -> Result<Vec<Channel>> {
        Ok(self.read()?.channels_of(network_id))
    }

    async fn upsert_network(&self, network: &mut Network) -> Result<()> {
        let id = {
            let mut inner = self.write()?;
            let now = now_millis();

            let id = if network.id.is_unset() {
                inner.last_network_id += 1;
                NetworkId::new(inner.last_network_id)
            } else if inner.networks.contains_key(&network.id) {
                network.id
            } else {
                return Err(StoreError::NetworkNotFound(network.id));
            };

            inner.networks.insert(
                id,
                StoredNetwork {
                    network: stored_network(network, id),
                    updated_at: now,
                },
            );
            id
        };

        network.assign_id(id)?;
        Ok(())
    }

    async fn delete_network(&self, id: NetworkId) -> Result<()> {
        let mut inner = self.write()?;
        inner.networks.remove(&id);
        inner.channels.retain(|_, c| c.network_id != id);
        Ok(())
    }
}

#[async_trait]
impl ChannelStore for MemoryStore {
    async fn list_channels_by_network(&self, network_id: NetworkId) -> Result<Vec<Channel>> {
        Ok(self.read()?.channels_of(network_id))
    }

    async fn upsert_channel(&self, network_id: NetworkId, channel: &mut Channel) -> Result<()> {
        let mut inner = self.write()?;

        if channel.id.is_unset() {
            if !inner.networks.contains_key(&network_id) {
                return Err(StoreError::NetworkNotFound(network_id));
            }

            inner.last_channel_id += 1;
            let id = ChannelId::new(inner.last_channel_id);

            let mut stored = channel.normalized();
            stored.id = id;
            stored.network_id = network_id;
            stored.detached = true;
            inner.channels.insert(id, stored);

            channel.assign_id(id)?;
            channel.network_id = network_id;
            channel.detached = true;
            return Ok(());
        }

        let stored = inner
            .channels
            .get_mut(&channel.id)
            .ok_or(StoreError::ChannelNotFound(channel.id))?;

        let owner = stored.network_id;
        *stored = channel.normalized();
        stored.network_id = owner;
        channel.network_id = owner;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let mut net = Network::new("OFTC", "irc.oftc.net", 6697).tls(true);

        store.upsert_network(&mut net).await.unwrap();
        assert_eq!(net.id, NetworkId::new(1));

        let got = store.get_network(net.id).await.unwrap();
        assert_eq!(got, net.normalized());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let mut a = Network::new("a", "a.example", 6667);
        store.upsert_network(&mut a).await.unwrap();
        store.delete_network(a.id).await.unwrap();

        let mut b = Network::new("b", "b.example", 6667);
        store.upsert_network(&mut b).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_update_touches_timestamp() {
        let store = MemoryStore::new();
        let mut net = Network::new("a", "a.example", 6667);
        store.upsert_network(&mut net).await.unwrap();

        store
            .write()
            .unwrap()
            .networks
            .get_mut(&net.id)
            .unwrap()
            .updated_at = 0;
        assert_eq!(store.network_updated_at(net.id).unwrap(), 0);

        net.name = "b".into();
        store.upsert_network(&mut net).await.unwrap();
        assert!(store.network_updated_at(net.id).unwrap() > 0);
    }
}
