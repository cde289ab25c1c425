//! Channel: a room within a network.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::optional::normalize_owned;
use crate::types::{ChannelId, NetworkId};

/// A channel configured on a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Storage identity, `0` until persisted.
    #[serde(default)]
    pub id: ChannelId,

    /// Owning network. Set by the store on insert.
    #[serde(default)]
    pub network_id: NetworkId,

    /// Channel name including its prefix, e.g. `#test`.
    pub name: String,

    /// Whether the channel should be joined.
    pub enabled: bool,

    /// Configured but not currently joined.
    #[serde(default)]
    pub detached: bool,

    /// Join key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Channel {
    /// Create an enabled, unpersisted channel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Set the join key.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the channel has been persisted.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_unset()
    }

    /// Record the storage-assigned identity.
    pub fn assign_id(&mut self, id: ChannelId) -> Result<()> {
        self.id.assign(id)
    }

    /// This channel as it reads back from storage.
    pub fn normalized(&self) -> Self {
        Self {
            password: normalize_owned(self.password.clone()),
            ..self.clone()
        }
    }
}
