//! End-to-end use of the facade with a file-backed store.

use ircwatch::store::StoreError;
use ircwatch::{
    Channel, ChannelStore, Config, DatabaseConfig, Error, Ircwatch, Network, NetworkId, NetworkStore,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn config(dir: &tempfile::TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            path: Some(dir.path().join("ircwatch.db")),
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn oftc_lifecycle() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let app = Ircwatch::open(config(&dir)).unwrap();
    let store = app.store();

    let mut network = Network::new("OFTC", "irc.oftc.net", 6697).tls(true);
    store.upsert_network(&mut network).await.unwrap();
    assert!(network.is_persisted());

    let mut channel = Channel::new("#test");
    store.upsert_channel(network.id, &mut channel).await.unwrap();

    let channels = store.list_channels_by_network(network.id).await.unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].name, "#test");
    assert!(channels[0].detached);
    assert_eq!(channels[0].network_id, network.id);

    store.delete_network(network.id).await.unwrap();

    let err = store.get_network(network.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NetworkNotFound(id) if id == network.id));
    assert!(store.list_channels_by_network(network.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let app = Ircwatch::open(config(&dir)).unwrap();
        let mut network = Network::new("OFTC", "irc.oftc.net", 6697)
            .tls(true)
            .nickserv("watcher", "hunter2")
            .channel(Channel::new("#test").password("key"));
        app.save_network(&mut network).await.unwrap();
        network.id
    };

    let app = Ircwatch::open(config(&dir)).unwrap();
    let network = app.load_network(id).await.unwrap();
    assert_eq!(network.name, "OFTC");
    assert_eq!(network.nickserv.unwrap().account, "watcher");
    assert_eq!(network.channels.len(), 1);
    assert_eq!(network.channels[0].password.as_deref(), Some("key"));
}

#[tokio::test]
async fn errors_convert_into_facade_error() {
    let app = Ircwatch::open(Config::default()).unwrap();

    let mut ghost = Network::new("Ghost", "irc.ghost.example", 6667);
    ghost.id = NetworkId::new(42);
    let err: Error = app.save_network(&mut ghost).await.unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::NetworkNotFound(_))));

    let nothing = app
        .fetch("", &ircwatch::FetchOptions::default())
        .await
        .unwrap();
    assert!(nothing.is_none());
}
