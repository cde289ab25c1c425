//! Database schema for SQLite.
//!
//! The schema is created in place on open. Every statement is
//! `IF NOT EXISTS`, so opening an existing database changes nothing.

use rusqlite::Connection;

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS network (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    enabled INTEGER NOT NULL DEFAULT 1,
    name TEXT NOT NULL,
    server TEXT NOT NULL,
    port INTEGER NOT NULL,
    tls INTEGER NOT NULL DEFAULT 0,
    pass TEXT,
    invite_command TEXT,
    nickserv_account TEXT,
    nickserv_password TEXT,
    created_at INTEGER NOT NULL,      -- Unix ms
    updated_at INTEGER NOT NULL       -- Unix ms, rewritten on every update
);

-- Channel rows are removed explicitly when their network is deleted.
-- The reference is checked at commit so the network row can go first.
CREATE TABLE IF NOT EXISTS channel (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    network_id INTEGER NOT NULL
        REFERENCES network(id) DEFERRABLE INITIALLY DEFERRED,
    enabled INTEGER NOT NULL DEFAULT 1,
    detached INTEGER NOT NULL DEFAULT 1,
    name TEXT NOT NULL,
    password TEXT
);

CREATE INDEX IF NOT EXISTS idx_channel_network ON channel(network_id);
"#;

/// Create the tables and index if they are missing.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("schema ready");
    Ok(())
}
