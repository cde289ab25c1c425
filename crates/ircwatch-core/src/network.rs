//! Network: a configured chat-server endpoint.

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::Result;
use crate::optional::normalize_owned;
use crate::types::NetworkId;

/// NickServ credentials used to identify on connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NickServ {
    /// Registered account name.
    pub account: String,

    /// Account password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NickServ {
    /// Build credentials from the two nullable storage columns.
    ///
    /// Returns `None` when neither column carries a value.
    pub fn from_columns(account: Option<String>, password: Option<String>) -> Option<Self> {
        let account = normalize_owned(account);
        let password = normalize_owned(password);
        if account.is_none() && password.is_none() {
            return None;
        }
        Some(Self {
            account: account.unwrap_or_default(),
            password,
        })
    }
}

/// A monitored network and its channel configuration.
///
/// Constructed in memory with [`NetworkId::UNSET`]; the store assigns the
/// identity on first upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Storage identity, `0` until persisted.
    #[serde(default)]
    pub id: NetworkId,

    /// Whether the network should be connected.
    pub enabled: bool,

    /// Display name.
    pub name: String,

    /// Server host name.
    pub server: String,

    /// Server port.
    pub port: u16,

    /// Connect over TLS.
    pub tls: bool,

    /// Server password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,

    /// Raw command sent to request channel invites after connect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_command: Option<String>,

    /// NickServ credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickserv: Option<NickServ>,

    /// Channels configured on this network.
    ///
    /// Not loaded by network lookups; use the channel listing operations.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl Network {
    /// Create an enabled, unpersisted network.
    pub fn new(name: impl Into<String>, server: impl Into<String>, port: u16) -> Self {
        Self {
            enabled: true,
            name: name.into(),
            server: server.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the TLS flag.
    pub fn tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the server password.
    pub fn pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    /// Set the invite command.
    pub fn invite_command(mut self, command: impl Into<String>) -> Self {
        self.invite_command = Some(command.into());
        self
    }

    /// Set NickServ credentials.
    pub fn nickserv(mut self, account: impl Into<String>, password: impl Into<String>) -> Self {
        self.nickserv = Some(NickServ {
            account: account.into(),
            password: Some(password.into()),
        });
        self
    }

    /// Add a channel.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Whether the network has been persisted.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_unset()
    }

    /// Record the storage-assigned identity.
    ///
    /// Channels already attached to this value are re-parented to the new
    /// identity.
    pub fn assign_id(&mut self, id: NetworkId) -> Result<()> {
        self.id.assign(id)?;
        for channel in &mut self.channels {
            channel.network_id = id;
        }
        Ok(())
    }

    /// This network as it reads back from storage.
    ///
    /// Empty optional values become `None` and the channel list is dropped.
    pub fn normalized(&self) -> Self {
        Self {
            pass: normalize_owned(self.pass.clone()),
            invite_command: normalize_owned(self.invite_command.clone()),
            nickserv: self
                .nickserv
                .clone()
                .and_then(|ns| NickServ::from_columns(Some(ns.account), ns.password)),
            channels: Vec::new(),
            ..self.clone()
        }
    }
}
