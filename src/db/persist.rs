//! Whole-graph persistence.
//!
//! [`save_graph`] replaces everything in SQLite with the current graph inside a
//! single transaction, so another connection sees either the previous save or
//! the new one, never an empty store. [`load_graph`] hydrates nodes first, then
//! edges, through the engine's normal insertion path.
//!
//! The JSON [`GraphDocument`] file is a secondary backup. [`Storage`] writes it
//! after each successful save (when enabled) and only reads it when the
//! primary store is empty or unreadable.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::CairnConfig;
use crate::error::{GraphError, Result};
use crate::graph::types::{Edge, GraphDocument, Metadata, MemoryNode};
use crate::graph::MemoryGraph;

/// Row counts written by a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Replace all persisted nodes and edges with the contents of `graph`.
///
/// Runs as one transaction: on any failure nothing changes.
pub fn save_graph(conn: &mut Connection, graph: &MemoryGraph) -> Result<SaveSummary> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM memory_edges", [])?;
    tx.execute("DELETE FROM memory_nodes", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO memory_nodes \
             (id, type, content, metadata, created_at, updated_at, importance, access_count, last_accessed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for node in graph.nodes() {
            stmt.execute(params![
                node.id,
                node.node_type.as_str(),
                node.content,
                serde_json::to_string(&node.metadata)?,
                node.created_at.to_rfc3339(),
                node.updated_at.to_rfc3339(),
                node.importance,
                node.access_count as i64,
                node.last_accessed.map(|t| t.to_rfc3339()),
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO memory_edges (source_id, target_id, relationship, metadata, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for edge in graph.edges() {
            stmt.execute(params![
                edge.source_id,
                edge.target_id,
                edge.relationship.as_str(),
                serde_json::to_string(&edge.metadata)?,
                edge.created_at.to_rfc3339(),
            ])?;
        }
    }

    tx.commit()?;

    let summary = SaveSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
    };
    tracing::info!(nodes = summary.nodes, edges = summary.edges, "graph saved");
    Ok(summary)
}

// ── Internal row structs ──────────────────────────────────────────────────────

struct NodeRow {
    id: String,
    node_type: String,
    content: String,
    metadata: String,
    created_at: String,
    updated_at: String,
    importance: f64,
    access_count: i64,
    last_accessed: Option<String>,
}

impl TryFrom<NodeRow> for MemoryNode {
    type Error = GraphError;

    fn try_from(row: NodeRow) -> Result<Self> {
        Ok(MemoryNode {
            node_type: row.node_type.parse()?,
            content: row.content,
            metadata: parse_metadata(&row.metadata)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            importance: row.importance,
            access_count: u64::try_from(row.access_count).map_err(|_| {
                GraphError::validation(format!(
                    "negative access_count {} on node {}",
                    row.access_count, row.id
                ))
            })?,
            last_accessed: row
                .last_accessed
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            id: row.id,
        })
    }
}

struct EdgeRow {
    source_id: String,
    target_id: String,
    relationship: String,
    metadata: String,
    created_at: String,
}

impl TryFrom<EdgeRow> for Edge {
    type Error = GraphError;

    fn try_from(row: EdgeRow) -> Result<Self> {
        Ok(Edge {
            relationship: row.relationship.parse()?,
            metadata: parse_metadata(&row.metadata)?,
            created_at: parse_timestamp(&row.created_at)?,
            source_id: row.source_id,
            target_id: row.target_id,
        })
    }
}

fn parse_metadata(raw: &str) -> Result<Metadata> {
    if raw.is_empty() {
        return Ok(Metadata::new());
    }
    Ok(serde_json::from_str(raw)?)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| GraphError::persistence(format!("invalid timestamp {raw:?}: {e}")))
}

/// Rebuild the graph from SQLite: nodes first, then edges.
///
/// An empty store yields an empty graph.
pub fn load_graph(conn: &Connection) -> Result<MemoryGraph> {
    // Both reads see the same committed save.
    let tx = conn.unchecked_transaction()?;
    let (node_rows, edge_rows) = read_rows(&tx)?;
    tx.finish()?;

    let mut graph = MemoryGraph::new();
    for row in node_rows {
        graph.add_node(MemoryNode::try_from(row)?)?;
    }
    for row in edge_rows {
        graph.insert_edge(Edge::try_from(row)?)?;
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

fn read_rows(conn: &Connection) -> Result<(Vec<NodeRow>, Vec<EdgeRow>)> {
    let mut stmt = conn.prepare(
        "SELECT id, type, content, metadata, created_at, updated_at, importance, access_count, last_accessed \
         FROM memory_nodes ORDER BY rowid",
    )?;
    let node_rows: Vec<NodeRow> = stmt
        .query_map([], |row| {
            Ok(NodeRow {
                id: row.get(0)?,
                node_type: row.get(1)?,
                content: row.get(2)?,
                metadata: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
                importance: row.get(6)?,
                access_count: row.get(7)?,
                last_accessed: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT source_id, target_id, relationship, metadata, created_at \
         FROM memory_edges ORDER BY id",
    )?;
    let edge_rows: Vec<EdgeRow> = stmt
        .query_map([], |row| {
            Ok(EdgeRow {
                source_id: row.get(0)?,
                target_id: row.get(1)?,
                relationship: row.get(2)?,
                metadata: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((node_rows, edge_rows))
}

/// Write a graph document as pretty JSON. Uses atomic write (tmp + rename).
pub fn write_document(path: &Path, doc: &GraphDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a graph document from a JSON file.
pub fn read_document(path: &Path) -> Result<GraphDocument> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// SQLite primary store plus optional JSON backup file.
pub struct Storage {
    conn: Connection,
    backup_path: Option<PathBuf>,
    write_backup: bool,
}

impl Storage {
    pub fn new(conn: Connection, backup_path: Option<PathBuf>, write_backup: bool) -> Self {
        Self {
            conn,
            backup_path,
            write_backup,
        }
    }

    /// Open the database and backup locations named in `config`.
    pub fn open(config: &CairnConfig) -> anyhow::Result<Self> {
        let conn = super::open_database(config.resolved_db_path())?;
        Ok(Self::new(
            conn,
            Some(config.resolved_backup_path()),
            config.storage.write_backup,
        ))
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    /// Replace persisted state with `graph`, then refresh the backup file.
    ///
    /// A backup write failure is reported even though the primary save committed.
    pub fn save_all(&mut self, graph: &MemoryGraph) -> Result<SaveSummary> {
        let summary = save_graph(&mut self.conn, graph)?;
        if let (true, Some(path)) = (self.write_backup, self.backup_path.as_deref()) {
            write_document(path, &graph.to_document())?;
            tracing::debug!(path = %path.display(), "backup written");
        }
        Ok(summary)
    }

    /// Load the graph from SQLite, falling back to the backup file when the
    /// primary store is empty or cannot be read.
    ///
    /// - primary has nodes: returned as is, backup ignored
    /// - primary empty: backup if present, else an empty graph
    /// - primary failed: backup if present, else the primary's error
    pub fn load_all(&self) -> Result<MemoryGraph> {
        match load_graph(&self.conn) {
            Ok(graph) if !graph.is_empty() => Ok(graph),
            Ok(graph) => match self.load_backup()? {
                Some(backup) => Ok(backup),
                None => Ok(graph),
            },
            Err(primary) => {
                tracing::warn!(error = %primary, "primary store unreadable, trying backup");
                match self.load_backup() {
                    Ok(Some(backup)) => Ok(backup),
                    Ok(None) => Err(primary),
                    Err(backup) => {
                        tracing::error!(error = %backup, "backup unreadable");
                        Err(primary)
                    }
                }
            }
        }
    }

    fn load_backup(&self) -> Result<Option<MemoryGraph>> {
        let Some(path) = self.backup_path.as_deref() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let graph = MemoryGraph::from_document(read_document(path)?)?;
        tracing::info!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded from backup"
        );
        Ok(Some(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::graph::types::{NodeType, RelationshipType};
    use serde_json::json;

    fn sample_graph() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        let mut meta = Metadata::new();
        meta.insert("source".into(), json!("chat"));
        graph
            .add_node(
                MemoryNode::new("n1", NodeType::Concept, "User likes Python", 0.8)
                    .unwrap()
                    .with_metadata(meta),
            )
            .unwrap();
        graph
            .add_node(MemoryNode::new("n2", NodeType::Event, "Team meeting Monday", 0.7).unwrap())
            .unwrap();
        graph
            .add_edge("n1", "n2", RelationshipType::RelatedTo, Metadata::new())
            .unwrap();
        graph
            .add_edge("n1", "n2", RelationshipType::RelatedTo, Metadata::new())
            .unwrap();
        graph.get_node("n2").unwrap();
        graph
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut conn = open_memory_database().unwrap();
        let graph = sample_graph();

        let summary = save_graph(&mut conn, &graph).unwrap();
        assert_eq!(summary, SaveSummary { nodes: 2, edges: 2 });

        let loaded = load_graph(&conn).unwrap();
        let original = graph.to_document();
        let restored = loaded.to_document();
        assert_eq!(original.nodes, restored.nodes);
        assert_eq!(original.edges, restored.edges);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let mut conn = open_memory_database().unwrap();
        save_graph(&mut conn, &sample_graph()).unwrap();

        let mut smaller = MemoryGraph::new();
        smaller
            .add_node(MemoryNode::new("only", NodeType::Task, "t", 0.2).unwrap())
            .unwrap();
        save_graph(&mut conn, &smaller).unwrap();

        let loaded = load_graph(&conn).unwrap();
        assert_eq!(loaded.node_count(), 1);
        assert_eq!(loaded.edge_count(), 0);
        assert!(loaded.contains("only"));
    }

    #[test]
    fn failed_save_rolls_back() {
        let mut conn = open_memory_database().unwrap();
        save_graph(&mut conn, &sample_graph()).unwrap();

        conn.execute_batch(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON memory_nodes \
             WHEN NEW.content = 'poison' BEGIN SELECT RAISE(ABORT, 'poisoned'); END;",
        )
        .unwrap();

        let mut bad = MemoryGraph::new();
        bad.add_node(MemoryNode::new("p", NodeType::Concept, "poison", 0.5).unwrap())
            .unwrap();
        assert!(save_graph(&mut conn, &bad).is_err());

        let loaded = load_graph(&conn).unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 2);
    }

    #[test]
    fn empty_store_loads_empty_graph() {
        let conn = open_memory_database().unwrap();
        let graph = load_graph(&conn).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn storage_without_backup_path() {
        let conn = open_memory_database().unwrap();
        let mut storage = Storage::new(conn, None, true);
        storage.save_all(&sample_graph()).unwrap();
        assert_eq!(storage.load_all().unwrap().node_count(), 2);
    }
}
