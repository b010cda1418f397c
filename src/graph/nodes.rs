//! Keyed node storage.
//!
//! [`NodeStore`] gives O(1) lookup by id and iterates in first-insertion order, so
//! stable sorts over it break remaining ties deterministically.

use std::collections::HashMap;

use super::types::MemoryNode;

#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: HashMap<String, MemoryNode>,
    order: Vec<String>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, overwriting any node with the same id (last write wins).
    ///
    /// The overwritten node keeps its original iteration position. Returns the
    /// replaced node, if any, so callers can log the overwrite.
    pub fn insert(&mut self, node: MemoryNode) -> Option<MemoryNode> {
        let id = node.id.clone();
        let previous = self.nodes.insert(id.clone(), node);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Fetch a node by id.
    ///
    /// **Read with side effect:** every successful lookup increments the node's
    /// `access_count` and sets `last_accessed`. Use [`NodeStore::peek`] for a pure read.
    pub fn get(&mut self, id: &str) -> Option<&MemoryNode> {
        let node = self.nodes.get_mut(id)?;
        node.access();
        Some(node)
    }

    /// Fetch a node without touching its access statistics.
    pub fn peek(&self, id: &str) -> Option<&MemoryNode> {
        self.nodes.get(id)
    }

    pub(crate) fn peek_mut(&mut self, id: &str) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in first-insertion order. Finite and lazy.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn remove(&mut self, id: &str) -> Option<MemoryNode> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::NodeType;

    fn node(id: &str, content: &str) -> MemoryNode {
        MemoryNode::new(id, NodeType::Concept, content, 0.5).unwrap()
    }

    #[test]
    fn insert_overwrites_silently() {
        let mut store = NodeStore::new();
        assert!(store.insert(node("a", "first")).is_none());
        let previous = store.insert(node("a", "second")).unwrap();

        assert_eq!(previous.content, "first");
        assert_eq!(store.len(), 1);
        assert_eq!(store.peek("a").unwrap().content, "second");
    }

    #[test]
    fn overwrite_keeps_iteration_position() {
        let mut store = NodeStore::new();
        store.insert(node("a", "1"));
        store.insert(node("b", "2"));
        store.insert(node("a", "3"));

        let ids: Vec<&str> = store.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn get_counts_accesses_but_peek_does_not() {
        let mut store = NodeStore::new();
        store.insert(node("a", "x"));

        store.peek("a");
        assert_eq!(store.peek("a").unwrap().access_count, 0);

        assert_eq!(store.get("a").unwrap().access_count, 1);
        assert_eq!(store.get("a").unwrap().access_count, 2);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn remove_drops_from_iteration() {
        let mut store = NodeStore::new();
        store.insert(node("a", "1"));
        store.insert(node("b", "2"));

        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        let ids: Vec<&str> = store.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }
}
