//! Directed multi-edge storage.
//!
//! Edges live in a single ordered map keyed by an insertion sequence number;
//! per-node outgoing and incoming key lists make successor and predecessor
//! lookups proportional to the node's degree. Several edges may connect the
//! same ordered pair, with the same or different relationship types.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::nodes::NodeStore;
use super::types::Edge;
use crate::error::{GraphError, Result};

#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    edges: BTreeMap<u64, Edge>,
    outgoing: HashMap<String, Vec<u64>>,
    incoming: HashMap<String, Vec<u64>>,
    next_key: u64,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge after checking both endpoints exist in `nodes`.
    ///
    /// Endpoints are never auto-created. Duplicate edges are kept.
    pub fn add_edge(&mut self, nodes: &NodeStore, edge: Edge) -> Result<()> {
        for (role, id) in [("source", &edge.source_id), ("target", &edge.target_id)] {
            if !nodes.contains(id) {
                return Err(GraphError::validation(format!(
                    "{role} node does not exist: {id}"
                )));
            }
        }

        let key = self.next_key;
        self.next_key += 1;

        self.outgoing
            .entry(edge.source_id.clone())
            .or_default()
            .push(key);
        self.incoming
            .entry(edge.target_id.clone())
            .or_default()
            .push(key);
        self.edges.insert(key, edge);
        Ok(())
    }

    /// Distinct ids reachable over one outgoing edge, in first-seen order.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(self.outgoing.get(id), |edge| edge.target_id.as_str())
    }

    /// Distinct ids with an edge pointing at `id`, in first-seen order.
    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(self.incoming.get(id), |edge| edge.source_id.as_str())
    }

    fn neighbor_ids<'a>(
        &'a self,
        keys: Option<&'a Vec<u64>>,
        endpoint: impl Fn(&'a Edge) -> &'a str,
    ) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        keys.into_iter()
            .flatten()
            .filter_map(|key| self.edges.get(key))
            .map(endpoint)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Every edge from `source` to `target`, oldest first.
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<&Edge> {
        self.outgoing_edges(source)
            .filter(|edge| edge.target_id == target)
            .collect()
    }

    pub fn outgoing_edges(&self, id: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.edges_for(self.outgoing.get(id))
    }

    pub fn incoming_edges(&self, id: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.edges_for(self.incoming.get(id))
    }

    fn edges_for<'a>(&'a self, keys: Option<&'a Vec<u64>>) -> impl Iterator<Item = &'a Edge> + 'a {
        keys.into_iter()
            .flatten()
            .filter_map(|key| self.edges.get(key))
    }

    /// Every edge with `id` at either end, each listed once (self-loops included), oldest first.
    pub fn incident_edges(&self, id: &str) -> Vec<&Edge> {
        self.incident_keys(id)
            .into_iter()
            .filter_map(|key| self.edges.get(&key))
            .collect()
    }

    fn incident_keys(&self, id: &str) -> Vec<u64> {
        let mut keys: Vec<u64> = self
            .outgoing
            .get(id)
            .into_iter()
            .chain(self.incoming.get(id))
            .flatten()
            .copied()
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Remove every edge touching `id` and return them, oldest first.
    ///
    /// Only the edge side is handled here; the caller removes the node itself
    /// from the [`NodeStore`].
    pub fn remove_node(&mut self, id: &str) -> Vec<Edge> {
        let keys = self.incident_keys(id);
        let mut removed = Vec::with_capacity(keys.len());

        for key in keys {
            let Some(edge) = self.edges.remove(&key) else {
                continue;
            };
            detach(&mut self.outgoing, &edge.source_id, key);
            detach(&mut self.incoming, &edge.target_id, key);
            removed.push(edge);
        }

        self.outgoing.remove(id);
        self.incoming.remove(id);
        removed
    }

    /// All edges, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn detach(index: &mut HashMap<String, Vec<u64>>, id: &str, key: u64) {
    if let Some(keys) = index.get_mut(id) {
        keys.retain(|k| *k != key);
        if keys.is_empty() {
            index.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Metadata, MemoryNode, NodeType, RelationshipType};

    fn store_with(ids: &[&str]) -> NodeStore {
        let mut nodes = NodeStore::new();
        for id in ids {
            nodes.insert(MemoryNode::new(*id, NodeType::Entity, *id, 0.5).unwrap());
        }
        nodes
    }

    fn edge(source: &str, target: &str, rel: RelationshipType) -> Edge {
        Edge::new(source, target, rel, Metadata::new())
    }

    #[test]
    fn add_edge_requires_both_endpoints() {
        let nodes = store_with(&["a"]);
        let mut rels = RelationStore::new();

        let err = rels
            .add_edge(&nodes, edge("a", "ghost", RelationshipType::RelatedTo))
            .unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
        assert!(err.to_string().contains("target"));

        let err = rels
            .add_edge(&nodes, edge("ghost", "a", RelationshipType::RelatedTo))
            .unwrap_err();
        assert!(err.to_string().contains("source"));
        assert!(rels.is_empty());
    }

    #[test]
    fn parallel_edges_coexist_but_neighbors_dedupe() {
        let nodes = store_with(&["a", "b"]);
        let mut rels = RelationStore::new();
        rels.add_edge(&nodes, edge("a", "b", RelationshipType::RelatedTo)).unwrap();
        rels.add_edge(&nodes, edge("a", "b", RelationshipType::PartOf)).unwrap();
        rels.add_edge(&nodes, edge("a", "b", RelationshipType::RelatedTo)).unwrap();

        assert_eq!(rels.len(), 3);
        assert_eq!(rels.edges_between("a", "b").len(), 3);
        assert!(rels.edges_between("b", "a").is_empty());
        assert_eq!(rels.successors("a"), vec!["b"]);
        assert_eq!(rels.predecessors("b"), vec!["a"]);
        assert!(rels.successors("b").is_empty());
    }

    #[test]
    fn remove_node_drops_incident_edges_only() {
        let nodes = store_with(&["a", "b", "c"]);
        let mut rels = RelationStore::new();
        rels.add_edge(&nodes, edge("a", "b", RelationshipType::RelatedTo)).unwrap();
        rels.add_edge(&nodes, edge("c", "a", RelationshipType::CausedBy)).unwrap();
        rels.add_edge(&nodes, edge("b", "c", RelationshipType::Involves)).unwrap();
        rels.add_edge(&nodes, edge("a", "a", RelationshipType::SimilarTo)).unwrap();

        let removed = rels.remove_node("a");
        assert_eq!(removed.len(), 3);
        assert_eq!(rels.len(), 1);
        assert!(rels.predecessors("b").is_empty());
        assert!(rels.successors("c").is_empty());
        assert_eq!(rels.successors("b"), vec!["c"]);
    }

    #[test]
    fn incident_edges_lists_self_loop_once() {
        let nodes = store_with(&["a", "b"]);
        let mut rels = RelationStore::new();
        rels.add_edge(&nodes, edge("a", "a", RelationshipType::SimilarTo)).unwrap();
        rels.add_edge(&nodes, edge("b", "a", RelationshipType::PartOf)).unwrap();

        let incident = rels.incident_edges("a");
        assert_eq!(incident.len(), 2);
        assert_eq!(incident[0].relationship, RelationshipType::SimilarTo);
        assert_eq!(incident[1].relationship, RelationshipType::PartOf);
    }
}
