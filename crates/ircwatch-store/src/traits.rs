//! Store traits: the abstract interface for network and channel persistence.
//!
//! The traits keep callers storage-agnostic. Implementations include SQLite
//! (primary) and in-memory (for tests).

use async_trait::async_trait;
use ircwatch_core::{Channel, Network, NetworkId};

use crate::error::Result;

/// Persistence for [`Network`] configuration.
///
/// # Design Notes
///
/// - **Identity by sentinel**: `upsert_network` inserts when the id is
///   [`NetworkId::UNSET`] and writes the new identity back into the value.
/// - **Full-row overwrite**: updates rewrite every column. There is no
///   version check; the last writer wins.
/// - **Atomic cascade**: `delete_network` removes the network and all of its
///   channels in one transaction, or nothing at all.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// Get a network by identity.
    ///
    /// Fails with [`StoreError::NetworkNotFound`](crate::StoreError::NetworkNotFound)
    /// when no row matches. The returned value has an empty channel list.
    async fn get_network(&self, id: NetworkId) -> Result<Network>;

    /// List all networks in insertion order.
    async fn list_networks(&self) -> Result<Vec<Network>>;

    /// List the channels of a network in insertion order.
    async fn list_channels(&self, network_id: NetworkId) -> Result<Vec<Channel>>;

    /// Insert or fully overwrite a network.
    ///
    /// Updating an identity with no matching row fails with
    /// [`StoreError::NetworkNotFound`](crate::StoreError::NetworkNotFound).
    async fn upsert_network(&self, network: &mut Network) -> Result<()>;

    /// Delete a network together with its channels.
    ///
    /// An error means nothing was deleted. Deleting an unknown identity is
    /// not an error.
    async fn delete_network(&self, id: NetworkId) -> Result<()>;
}

/// Persistence for [`Channel`] configuration, scoped to a network.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// List all channels owned by a network, in insertion order.
    async fn list_channels_by_network(&self, network_id: NetworkId) -> Result<Vec<Channel>>;

    /// Insert or overwrite a channel.
    ///
    /// - Insert (`id` unset): stored under `network_id`, always as detached,
    ///   and the new identity is written back into `channel`. Fails with
    ///   [`StoreError::NetworkNotFound`](crate::StoreError::NetworkNotFound) if
    ///   the network does not exist.
    /// - Update: rewrites enabled, detached, name and password. The owning
    ///   network never changes.
    async fn upsert_channel(&self, network_id: NetworkId, channel: &mut Channel) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait NetworkStoreExt: NetworkStore + ChannelStore {
    /// Persist a network and then each channel in `network.channels`.
    ///
    /// Identities are written back into the network and its channels. The
    /// calls are independent; a failure part-way leaves earlier writes in place.
    fn save_network_with_channels(
        &self,
        network: &mut Network,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: NetworkStore + ChannelStore + ?Sized> NetworkStoreExt for S {
    async fn save_network_with_channels(&self, network: &mut Network) -> Result<()> {
        self.upsert_network(network).await?;

        let network_id = network.id;
        for channel in &mut network.channels {
            self.upsert_channel(network_id, channel).await?;
        }

        Ok(())
    }
}
