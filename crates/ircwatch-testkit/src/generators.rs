//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ircwatch_core::{Channel, Network, NickServ};

/// Generate a network or server name.
pub fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9.-]{0,31}".prop_map(String::from)
}

/// Generate a channel name.
pub fn channel_name() -> impl Strategy<Value = String> {
    "[#&][a-z0-9_-]{1,24}".prop_map(String::from)
}

/// Generate an optional text value, including the empty string.
///
/// Empty strings are kept so tests cover the empty-means-absent rule.
pub fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ -~]{1,16}".prop_map(Some),
    ]
}

/// Generate NickServ credentials, possibly with empty parts.
pub fn nickserv() -> impl Strategy<Value = Option<NickServ>> {
    prop_oneof![
        Just(None),
        ("[a-z]{0,12}", optional_text())
            .prop_map(|(account, password)| Some(NickServ { account, password })),
    ]
}

/// Parameters for generating a channel.
#[derive(Debug, Clone)]
pub struct ChannelParams {
    pub name: String,
    pub enabled: bool,
    pub detached: bool,
    pub password: Option<String>,
}

impl ChannelParams {
    /// Build an unpersisted channel.
    pub fn build(&self) -> Channel {
        Channel {
            name: self.name.clone(),
            enabled: self.enabled,
            detached: self.detached,
            password: self.password.clone(),
            ..Channel::default()
        }
    }
}

impl Arbitrary for ChannelParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (channel_name(), any::<bool>(), any::<bool>(), optional_text())
            .prop_map(|(name, enabled, detached, password)| ChannelParams {
                name,
                enabled,
                detached,
                password,
            })
            .boxed()
    }
}

/// Parameters for generating a network.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub tls: bool,
    pub enabled: bool,
    pub pass: Option<String>,
    pub invite_command: Option<String>,
    pub nickserv: Option<NickServ>,
    pub channels: Vec<ChannelParams>,
}

impl NetworkParams {
    /// Build an unpersisted network with its channels attached.
    pub fn build(&self) -> Network {
        Network {
            name: self.name.clone(),
            server: self.server.clone(),
            port: self.port,
            tls: self.tls,
            enabled: self.enabled,
            pass: self.pass.clone(),
            invite_command: self.invite_command.clone(),
            nickserv: self.nickserv.clone(),
            channels: self.channels.iter().map(ChannelParams::build).collect(),
            ..Network::default()
        }
    }
}

impl Arbitrary for NetworkParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            name(),
            name(),
            any::<u16>(),
            any::<bool>(),
            any::<bool>(),
            optional_text(),
            optional_text(),
            nickserv(),
            prop::collection::vec(any::<ChannelParams>(), 0..4),
        )
            .prop_map(
                |(name, server, port, tls, enabled, pass, invite_command, nickserv, channels)| {
                    NetworkParams {
                        name,
                        server,
                        port,
                        tls,
                        enabled,
                        pass,
                        invite_command,
                        nickserv,
                        channels,
                    }
                },
            )
            .boxed()
    }
}
