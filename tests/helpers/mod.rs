#![allow(dead_code)]

use cairn::db::{self, persist::Storage};
use cairn::{MemoryGraph, MemoryNode, Metadata, NodeType, RelationshipType};
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a node with the given id, content and importance.
pub fn node(id: &str, content: &str, importance: f64) -> MemoryNode {
    MemoryNode::new(id, NodeType::Concept, content, importance).unwrap()
}

/// Insert a test node directly into the graph.
pub fn insert(graph: &mut MemoryGraph, id: &str, content: &str, importance: f64) {
    graph.add_node(node(id, content, importance)).unwrap();
}

/// Add an edge with empty metadata.
pub fn link(graph: &mut MemoryGraph, source: &str, target: &str, relationship: RelationshipType) {
    graph
        .add_edge(source, target, relationship, Metadata::new())
        .unwrap();
}

/// The two-node graph used throughout: `n1` "User likes Python" (0.8) and
/// `n2` "Team meeting Monday" (0.7).
pub fn sample_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    insert(&mut graph, "n1", "User likes Python", 0.8);
    insert(&mut graph, "n2", "Team meeting Monday", 0.7);
    graph
}

pub fn ids(nodes: &[MemoryNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

pub fn sorted_ids(nodes: &[MemoryNode]) -> Vec<String> {
    let mut ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    ids.sort();
    ids
}

/// A temp directory holding a database file and a backup path.
pub struct TestStore {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub backup_path: PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("cairn.db");
        let backup_path = dir.path().join("memory.json");
        Self {
            dir,
            db_path,
            backup_path,
        }
    }

    /// Open storage over this directory with backups enabled.
    pub fn open(&self) -> Storage {
        let conn = db::open_database(&self.db_path).unwrap();
        Storage::new(conn, Some(self.backup_path.clone()), true)
    }
}
