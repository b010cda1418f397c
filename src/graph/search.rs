//! Read path: substring search, neighborhood traversal and context assembly.
//!
//! None of these touch access statistics. All of them are linear scans or
//! degree-bounded lookups over in-memory maps; there is no text index.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::Utc;

use super::types::{MemoryNode, NodeType};
use super::MemoryGraph;

impl MemoryGraph {
    /// Find nodes by type and/or case-insensitive substring of `content`.
    ///
    /// `None` or an empty query matches every node. Results are ordered by
    /// importance, then access count, both descending; remaining ties keep
    /// insertion order. O(n) per call.
    pub fn find_nodes(
        &self,
        query: Option<&str>,
        node_type: Option<NodeType>,
        limit: usize,
    ) -> Vec<MemoryNode> {
        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);

        let mut results: Vec<&MemoryNode> = self
            .nodes
            .iter()
            .filter(|node| node_type.map_or(true, |t| node.node_type == t))
            .filter(|node| {
                needle
                    .as_deref()
                    .map_or(true, |n| node.content.to_lowercase().contains(n))
            })
            .collect();

        results.sort_by(|a, b| by_importance_then_access(a, b));
        results.truncate(limit);

        tracing::debug!(
            query = query.unwrap_or(""),
            node_type = node_type.map(|t| t.as_str()).unwrap_or("any"),
            matched = results.len(),
            "find_nodes"
        );
        results.into_iter().cloned().collect()
    }

    /// Neighbors of `id` over edges in either direction.
    ///
    /// `depth == 0` yields nothing; `1` yields direct successors and
    /// predecessors; `2` adds the successors and predecessors of each of those.
    /// Traversal stops at two hops, so any depth above 2 behaves exactly like 2.
    /// The starting node is left out of the first hop; from depth 2 on it comes
    /// back as a neighbor of its own neighbors. An unknown id yields nothing.
    pub fn related_nodes(&self, id: &str, depth: usize) -> Vec<MemoryNode> {
        self.related_ids(id, depth)
            .into_iter()
            .filter_map(|rid| self.nodes.peek(rid))
            .cloned()
            .collect()
    }

    fn related_ids<'a>(&'a self, id: &'a str, depth: usize) -> Vec<&'a str> {
        if depth == 0 || !self.nodes.contains(id) {
            return Vec::new();
        }

        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut ordered = Vec::new();

        let first_hop = self.neighbors(id);
        for n in first_hop.iter().copied() {
            if seen.insert(n) {
                ordered.push(n);
            }
        }

        if depth >= 2 {
            seen.remove(id);
            for hop in first_hop {
                for n in self.neighbors(hop) {
                    if seen.insert(n) {
                        ordered.push(n);
                    }
                }
            }
        }

        ordered
    }

    fn neighbors<'a>(&'a self, id: &str) -> Vec<&'a str> {
        let mut out = self.relations.successors(id);
        out.extend(self.relations.predecessors(id));
        out
    }

    /// Assemble ranked context for `query`.
    ///
    /// Seeds are `find_nodes(query, limit = max_nodes)`; each seed contributes its
    /// depth-1 neighborhood. Candidates are ranked by importance, then access
    /// count, then seconds since `updated_at`, all descending, and truncated to
    /// `max_nodes`.
    ///
    /// The recency key is not inverted: when importance and access count tie,
    /// the node updated longest ago ranks first.
    pub fn context(&self, query: &str, max_nodes: usize) -> Vec<MemoryNode> {
        let seeds = self.find_nodes(Some(query), None, max_nodes);

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<MemoryNode> = Vec::new();
        for seed in &seeds {
            if seen.insert(seed.id.clone()) {
                candidates.push(seed.clone());
            }
        }
        for seed in &seeds {
            for related in self.related_nodes(&seed.id, 1) {
                if seen.insert(related.id.clone()) {
                    candidates.push(related);
                }
            }
        }

        let now = Utc::now();
        candidates.sort_by(|a, b| {
            by_importance_then_access(a, b).then_with(|| {
                b.seconds_since_update(now)
                    .total_cmp(&a.seconds_since_update(now))
            })
        });
        candidates.truncate(max_nodes);

        tracing::debug!(
            query = %query,
            seeds = seeds.len(),
            returned = candidates.len(),
            "context assembled"
        );
        candidates
    }
}

/// Descending importance, then descending access count.
fn by_importance_then_access(a: &MemoryNode, b: &MemoryNode) -> Ordering {
    b.importance
        .total_cmp(&a.importance)
        .then_with(|| b.access_count.cmp(&a.access_count))
}
