use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::types::{NodeType, RelationshipType};
use super::MemoryGraph;

/// Response from memory_stats.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_nodes: u64,
    pub total_edges: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_relationship: BTreeMap<String, u64>,
    pub total_accesses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_node: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_node: Option<DateTime<Utc>>,
}

impl MemoryGraph {
    /// Compute graph statistics. Every node and relationship type is present
    /// in the breakdowns, with zero counts where absent.
    pub fn stats(&self) -> StatsResponse {
        let mut by_type: BTreeMap<String, u64> = NodeType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();
        let mut by_relationship: BTreeMap<String, u64> = RelationshipType::ALL
            .iter()
            .map(|r| (r.as_str().to_string(), 0))
            .collect();

        let mut total_accesses = 0;
        let mut oldest: Option<DateTime<Utc>> = None;
        let mut newest: Option<DateTime<Utc>> = None;

        for node in self.nodes() {
            *by_type.entry(node.node_type.as_str().to_string()).or_default() += 1;
            total_accesses += node.access_count;
            oldest = Some(oldest.map_or(node.created_at, |o| o.min(node.created_at)));
            newest = Some(newest.map_or(node.created_at, |n| n.max(node.created_at)));
        }
        for edge in self.edges() {
            *by_relationship
                .entry(edge.relationship.as_str().to_string())
                .or_default() += 1;
        }

        StatsResponse {
            total_nodes: self.node_count() as u64,
            total_edges: self.edge_count() as u64,
            by_type,
            by_relationship,
            total_accesses,
            oldest_node: oldest,
            newest_node: newest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::add;
    use crate::graph::types::{Metadata, MemoryNode};

    #[test]
    fn stats_on_empty_graph() {
        let stats = MemoryGraph::new().stats();
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.by_type.len(), NodeType::ALL.len());
        assert_eq!(stats.by_type["event"], 0);
        assert!(stats.oldest_node.is_none());
    }

    #[test]
    fn stats_counts_types_and_relationships() {
        let mut graph = MemoryGraph::new();
        add(&mut graph, "a", "a", 0.5);
        add(&mut graph, "b", "b", 0.5);
        graph
            .add_node(MemoryNode::new("e", NodeType::Event, "standup", 0.5).unwrap())
            .unwrap();
        graph
            .add_edge("a", "b", RelationshipType::PartOf, Metadata::new())
            .unwrap();
        graph
            .add_edge("a", "b", RelationshipType::PartOf, Metadata::new())
            .unwrap();
        graph.get_node("e").unwrap();

        let stats = graph.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.by_type["concept"], 2);
        assert_eq!(stats.by_type["event"], 1);
        assert_eq!(stats.by_relationship["part_of"], 2);
        assert_eq!(stats.by_relationship["related_to"], 0);
        assert_eq!(stats.total_accesses, 1);
        assert!(stats.oldest_node <= stats.newest_node);
    }
}
