//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite; each operation runs on a blocking thread via
//! `tokio::task::spawn_blocking` over one shared connection.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use ircwatch_core::optional::normalize_owned;
use ircwatch_core::{normalize_optional, Channel, ChannelId, Network, NetworkId, NickServ};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::now_millis;
use crate::traits::{ChannelStore, NetworkStore};

/// SQLite virtual-machine steps between cancellation checks.
const PROGRESS_INTERVAL: i32 = 1_000;

/// How long a statement waits on a lock held by another connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const NETWORK_COLUMNS: &str = "id, enabled, name, server, port, tls, pass, invite_command, \
                               nickserv_account, nickserv_password";

const CHANNEL_COLUMNS: &str = "id, network_id, name, enabled, detached, password";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Cloning shares the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and the schema if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened sqlite store");
        Self::from_connection(conn)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` on the connection from a blocking thread.
    ///
    /// If the returned future is dropped first, the operation is flagged as
    /// cancelled: it is skipped if it has not started, and otherwise the
    /// progress handler interrupts the running statement so any open
    /// transaction rolls back.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let guard = CancelOnDrop::new();
        let cancelled = guard.flag();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;

            if cancelled.load(Ordering::Acquire) {
                return Err(StoreError::Cancelled);
            }

            let interrupt = Arc::clone(&cancelled);
            conn.progress_handler(
                PROGRESS_INTERVAL,
                Some(move || interrupt.load(Ordering::Acquire)),
            );
            let result = f(&mut conn);
            conn.progress_handler(0, None::<fn() -> bool>);

            result
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?;

        guard.disarm();
        result
    }
}

/// Raises the cancellation flag unless disarmed before drop.
struct CancelOnDrop {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl CancelOnDrop {
    fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            armed: true,
        }
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Release);
        }
    }
}

// Helper to convert a row to Network
fn row_to_network(row: &rusqlite::Row<'_>) -> rusqlite::Result<Network> {
    Ok(Network {
        id: NetworkId::new(row.get("id")?),
        enabled: row.get("enabled")?,
        name: row.get("name")?,
        server: row.get("server")?,
        port: row.get("port")?,
        tls: row.get::<_, Option<bool>>("tls")?.unwrap_or(false),
        pass: normalize_owned(row.get("pass")?),
        invite_command: normalize_owned(row.get("invite_command")?),
        nickserv: NickServ::from_columns(
            row.get("nickserv_account")?,
            row.get("nickserv_password")?,
        ),
        channels: Vec::new(),
    })
}

// Helper to convert a row to Channel
fn row_to_channel(row: &rusqlite::Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: ChannelId::new(row.get("id")?),
        network_id: NetworkId::new(row.get("network_id")?),
        name: row.get("name")?,
        enabled: row.get("enabled")?,
        detached: row.get("detached")?,
        password: normalize_owned(row.get("password")?),
    })
}

fn query_channels(conn: &Connection, network_id: NetworkId) -> Result<Vec<Channel>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channel WHERE network_id = ?1 ORDER BY id"
    ))?;

    let channels = stmt
        .query_map(params![network_id.get()], row_to_channel)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(channels)
}

#[async_trait]
impl NetworkStore for SqliteStore {
    async fn get_network(&self, id: NetworkId) -> Result<Network> {
        self.run(move |conn| {
            conn.query_row(
                &format!("SELECT {NETWORK_COLUMNS} FROM network WHERE id = ?1"),
                params![id.get()],
                row_to_network,
            )
            .optional()?
            .ok_or(StoreError::NetworkNotFound(id))
        })
        .await
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.run(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {NETWORK_COLUMNS} FROM network ORDER BY id"))?;

            let networks = stmt
                .query_map([], row_to_network)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(networks)
        })
        .await
    }

    async fn list_channels(&self, network_id: NetworkId) -> Result<Vec<Channel>> {
        self.run(move |conn| query_channels(conn, network_id)).await
    }

    async fn upsert_network(&self, network: &mut Network) -> Result<()> {
        let row = network.clone();

        let id = self
            .run(move |conn| {
                let nickserv = row.nickserv.as_ref();
                let ns_account =
                    nickserv.and_then(|ns| normalize_optional(Some(ns.account.as_str())));
                let ns_password =
                    nickserv.and_then(|ns| normalize_optional(ns.password.as_deref()));
                let now = now_millis();

                if row.id.is_unset() {
                    conn.execute(
                        "INSERT INTO network (
                            enabled, name, server, port, tls, pass, invite_command,
                            nickserv_account, nickserv_password, created_at, updated_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                        params![
                            row.enabled,
                            &row.name,
                            &row.server,
                            row.port,
                            row.tls,
                            normalize_optional(row.pass.as_deref()),
                            normalize_optional(row.invite_command.as_deref()),
                            ns_account,
                            ns_password,
                            now,
                        ],
                    )?;
                    return Ok(NetworkId::new(conn.last_insert_rowid()));
                }

                let changed = conn.execute(
                    "UPDATE network SET
                        enabled = ?1,
                        name = ?2,
                        server = ?3,
                        port = ?4,
                        tls = ?5,
                        pass = ?6,
                        invite_command = ?7,
                        nickserv_account = ?8,
                        nickserv_password = ?9,
                        updated_at = ?10
                     WHERE id = ?11",
                    params![
                        row.enabled,
                        &row.name,
                        &row.server,
                        row.port,
                        row.tls,
                        normalize_optional(row.pass.as_deref()),
                        normalize_optional(row.invite_command.as_deref()),
                        ns_account,
                        ns_password,
                        now,
                        row.id.get(),
                    ],
                )?;

                if changed == 0 {
                    return Err(StoreError::NetworkNotFound(row.id));
                }
                Ok(row.id)
            })
            .await?;

        if network.id.is_unset() {
            tracing::info!(network_id = %id, name = %network.name, "inserted network");
        } else {
            tracing::debug!(network_id = %id, "updated network");
        }
        network.assign_id(id)?;

        Ok(())
    }

    async fn delete_network(&self, id: NetworkId) -> Result<()> {
        let result = self
            .run(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let networks = tx.execute("DELETE FROM network WHERE id = ?1", params![id.get()])?;
                let channels =
                    tx.execute("DELETE FROM channel WHERE network_id = ?1", params![id.get()])?;

                tx.commit()?;
                Ok((networks, channels))
            })
            .await;

        match result {
            Ok((networks, channels)) => {
                tracing::info!(network_id = %id, networks, channels, "deleted network");
                Ok(())
            }
            Err(e) => {
                tracing::error!(network_id = %id, error = %e, "error deleting network");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ChannelStore for SqliteStore {
    async fn list_channels_by_network(&self, network_id: NetworkId) -> Result<Vec<Channel>> {
        self.run(move |conn| query_channels(conn, network_id)).await
    }

    async fn upsert_channel(&self, network_id: NetworkId, channel: &mut Channel) -> Result<()> {
        let row = channel.clone();

        let (id, owner) = self
            .run(move |conn| {
                let password = normalize_optional(row.password.as_deref());

                if row.id.is_unset() {
                    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                    let exists: bool = tx.query_row(
                        "SELECT EXISTS(SELECT 1 FROM network WHERE id = ?1)",
                        params![network_id.get()],
                        |row| row.get(0),
                    )?;
                    if !exists {
                        return Err(StoreError::NetworkNotFound(network_id));
                    }

                    // New channels always start detached.
                    tx.execute(
                        "INSERT INTO channel (enabled, detached, name, password, network_id)
                         VALUES (?1, 1, ?2, ?3, ?4)",
                        params![row.enabled, &row.name, password, network_id.get()],
                    )?;
                    let id = ChannelId::new(tx.last_insert_rowid());

                    tx.commit()?;
                    return Ok((id, network_id));
                }

                let owner: Option<i64> = conn
                    .query_row(
                        "UPDATE channel SET enabled = ?1, detached = ?2, name = ?3, password = ?4
                         WHERE id = ?5
                         RETURNING network_id",
                        params![row.enabled, row.detached, &row.name, password, row.id.get()],
                        |row| row.get(0),
                    )
                    .optional()?;

                match owner {
                    Some(owner) => Ok((row.id, NetworkId::new(owner))),
                    None => Err(StoreError::ChannelNotFound(row.id)),
                }
            })
            .await?;

        if channel.id.is_unset() {
            channel.detached = true;
            tracing::info!(channel_id = %id, network_id = %owner, name = %channel.name, "inserted channel");
        } else {
            tracing::debug!(channel_id = %id, network_id = %owner, "updated channel");
        }
        channel.assign_id(id)?;
        channel.network_id = owner;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oftc() -> Network {
        Network::new("OFTC", "irc.oftc.net", 6697).tls(true)
    }

    fn updated_at(store: &SqliteStore, id: NetworkId) -> i64 {
        let conn = store.conn.lock().unwrap();
        conn.query_row(
            "SELECT updated_at FROM network WHERE id = ?1",
            params![id.get()],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_network() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc().pass("secret").nickserv("bot", "hunter2");

        store.upsert_network(&mut net).await.unwrap();
        assert_eq!(net.id, NetworkId::new(1));

        let got = store.get_network(net.id).await.unwrap();
        assert_eq!(got, net.normalized());
    }

    #[tokio::test]
    async fn test_get_missing_network() {
        let store = SqliteStore::open_memory().unwrap();
        let err = store.get_network(NetworkId::new(9)).await.unwrap_err();
        assert!(matches!(err, StoreError::NetworkNotFound(id) if id == NetworkId::new(9)));
    }

    #[tokio::test]
    async fn test_empty_optionals_stored_as_null() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc().pass("").invite_command("");
        store.upsert_network(&mut net).await.unwrap();

        let conn = store.conn.lock().unwrap();
        let (pass, invite): (Option<String>, Option<String>) = conn
            .query_row(
                "SELECT pass, invite_command FROM network WHERE id = ?1",
                params![net.id.get()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(pass, None);
        assert_eq!(invite, None);
    }

    #[tokio::test]
    async fn test_update_rewrites_timestamp() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc();
        store.upsert_network(&mut net).await.unwrap();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute("UPDATE network SET updated_at = 0", []).unwrap();
        }

        net.name = "OFTC2".into();
        store.upsert_network(&mut net).await.unwrap();
        assert!(updated_at(&store, net.id) > 0);
    }

    #[tokio::test]
    async fn test_channel_insert_forces_detached() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc();
        store.upsert_network(&mut net).await.unwrap();

        let mut ch = Channel::new("#test");
        ch.detached = false;
        store.upsert_channel(net.id, &mut ch).await.unwrap();

        let conn = store.conn.lock().unwrap();
        let detached: bool = conn
            .query_row(
                "SELECT detached FROM channel WHERE id = ?1",
                params![ch.id.get()],
                |row| row.get(0),
            )
            .unwrap();
        assert!(detached);
    }

    #[tokio::test]
    async fn test_channel_update_keeps_owner() {
        let store = SqliteStore::open_memory().unwrap();
        let mut a = oftc();
        let mut b = Network::new("Libera", "irc.libera.chat", 6697);
        store.upsert_network(&mut a).await.unwrap();
        store.upsert_network(&mut b).await.unwrap();

        let mut ch = Channel::new("#test");
        store.upsert_channel(a.id, &mut ch).await.unwrap();

        ch.detached = false;
        ch.name = "#renamed".into();
        store.upsert_channel(b.id, &mut ch).await.unwrap();
        assert_eq!(ch.network_id, a.id);

        let channels = store.list_channels_by_network(a.id).await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "#renamed");
        assert!(!channels[0].detached);
        assert!(store.list_channels_by_network(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_atomic_on_failure() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc();
        store.upsert_network(&mut net).await.unwrap();
        let mut ch = Channel::new("#test");
        store.upsert_channel(net.id, &mut ch).await.unwrap();

        // Make the second statement of the delete fail.
        {
            let conn = store.conn.lock().unwrap();
            conn.execute_batch(
                "CREATE TRIGGER block_channel_delete BEFORE DELETE ON channel
                 BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();
        }

        let err = store.delete_network(net.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        // Neither row is gone.
        assert_eq!(store.get_network(net.id).await.unwrap().name, "OFTC");
        assert_eq!(store.list_channels(net.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ircwatch.db");

        let mut net = oftc();
        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_network(&mut net).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let got = store.get_network(net.id).await.unwrap();
        assert_eq!(got.server, "irc.oftc.net");
    }

    #[test]
    fn test_cancel_guard() {
        let guard = CancelOnDrop::new();
        let flag = guard.flag();
        drop(guard);
        assert!(flag.load(Ordering::Acquire));

        let guard = CancelOnDrop::new();
        let flag = guard.flag();
        guard.disarm();
        assert!(!flag.load(Ordering::Acquire));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_delete_is_all_or_nothing() {
        let store = SqliteStore::open_memory().unwrap();
        let mut net = oftc();
        store.upsert_network(&mut net).await.unwrap();
        for name in ["#a", "#b", "#c"] {
            let mut ch = Channel::new(name);
            store.upsert_channel(net.id, &mut ch).await.unwrap();
        }

        let _ = tokio::time::timeout(Duration::ZERO, store.delete_network(net.id)).await;

        let network = store.get_network(net.id).await;
        let channels = store.list_channels(net.id).await.unwrap();
        match network {
            Ok(_) => assert_eq!(channels.len(), 3),
            Err(e) => {
                assert!(e.is_not_found());
                assert!(channels.is_empty());
            }
        }
    }
}
