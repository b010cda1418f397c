//! Standalone node deletion.
//!
//! Removing a node also removes every edge that touches it. There is no soft
//! delete: a forgotten node is gone from the graph and, after the next save,
//! from storage.

use serde::Serialize;

use super::MemoryGraph;
use crate::error::{GraphError, Result};

/// Result returned from a forget operation.
#[derive(Debug, Clone, Serialize)]
pub struct ForgetResult {
    /// ID of the removed node.
    pub id: String,
    /// Number of edges removed along with it.
    pub edges_removed: usize,
}

impl MemoryGraph {
    /// Remove a node and all its edges.
    pub fn remove_node(&mut self, id: &str) -> Result<ForgetResult> {
        if !self.nodes.contains(id) {
            return Err(GraphError::not_found(id));
        }

        let edges_removed = self.relations.remove_node(id).len();
        self.nodes.remove(id);

        tracing::info!(id = %id, edges_removed, "node removed");
        Ok(ForgetResult {
            id: id.to_string(),
            edges_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::add;
    use crate::graph::types::{Metadata, RelationshipType};

    #[test]
    fn remove_node_cascades_to_edges() {
        let mut graph = MemoryGraph::new();
        for id in ["a", "b", "c"] {
            add(&mut graph, id, id, 0.5);
        }
        graph
            .add_edge("a", "b", RelationshipType::RelatedTo, Metadata::new())
            .unwrap();
        graph
            .add_edge("c", "a", RelationshipType::Involves, Metadata::new())
            .unwrap();
        graph
            .add_edge("b", "c", RelationshipType::HappenedBefore, Metadata::new())
            .unwrap();

        let result = graph.remove_node("a").unwrap();
        assert_eq!(result.edges_removed, 2);
        assert!(!graph.contains("a"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.related_nodes("b", 1).iter().all(|n| n.id != "a"));
    }

    #[test]
    fn remove_missing_node_is_not_found() {
        let mut graph = MemoryGraph::new();
        assert!(matches!(graph.remove_node("a"), Err(GraphError::NotFound(_))));
    }
}
