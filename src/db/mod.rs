pub mod persist;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Open (or create) the Cairn database at the given path with the schema initialized.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with the schema initialized.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub integrity_ok: bool,
    pub integrity_message: String,
    pub schema_version: u32,
    pub node_count: u64,
    pub edge_count: u64,
    /// Edges whose endpoints are missing from `memory_nodes`.
    pub dangling_edges: u64,
}

/// Run integrity and consistency checks against an open database.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let integrity_message: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .context("integrity check failed to run")?;
    let schema_version = schema::get_schema_version(conn)?;

    let node_count: i64 = conn.query_row("SELECT COUNT(*) FROM memory_nodes", [], |r| r.get(0))?;
    let edge_count: i64 = conn.query_row("SELECT COUNT(*) FROM memory_edges", [], |r| r.get(0))?;
    let dangling_edges: i64 = conn.query_row(
        "SELECT COUNT(*) FROM memory_edges e \
         WHERE NOT EXISTS (SELECT 1 FROM memory_nodes n WHERE n.id = e.source_id) \
            OR NOT EXISTS (SELECT 1 FROM memory_nodes n WHERE n.id = e.target_id)",
        [],
        |r| r.get(0),
    )?;

    Ok(HealthReport {
        integrity_ok: integrity_message == "ok",
        integrity_message,
        schema_version,
        node_count: node_count as u64,
        edge_count: edge_count as u64,
        dangling_edges: dangling_edges as u64,
    })
}
