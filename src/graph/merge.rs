//! Node merging.
//!
//! [`MemoryGraph::merge_nodes`] folds a source node into a target and deletes the
//! source. Edges are copied, not moved, and never deduplicated, so an edge the
//! target already had can end up doubled.

use chrono::Utc;
use serde::Serialize;

use super::types::Edge;
use super::MemoryGraph;
use crate::error::{GraphError, Result};

/// Result returned from a merge operation.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    /// ID of the surviving node.
    pub target_id: String,
    /// ID of the deleted node.
    pub removed_id: String,
    /// Number of edges re-created against the target.
    pub edges_transferred: usize,
}

impl MemoryGraph {
    /// Merge `source_id` into `target_id`.
    ///
    /// - content becomes `target.content + "\n\n" + source.content`
    /// - source metadata keys overwrite target keys
    /// - importance is the max of the two; access counts are summed
    /// - every edge touching the source is re-created with the target
    ///   substituted for the source (relationship and metadata preserved)
    /// - the source and its original edges are removed
    ///
    /// Fails with [`GraphError::NotFound`] if either id is missing and with
    /// [`GraphError::Validation`] if both ids are the same.
    pub fn merge_nodes(&mut self, source_id: &str, target_id: &str) -> Result<MergeResult> {
        if source_id == target_id {
            return Err(GraphError::validation(format!(
                "cannot merge node {source_id} into itself"
            )));
        }
        let source = self
            .nodes
            .peek(source_id)
            .cloned()
            .ok_or_else(|| GraphError::not_found(source_id))?;
        if !self.nodes.contains(target_id) {
            return Err(GraphError::not_found(target_id));
        }

        let substitute = |id: &str| -> String {
            if id == source_id {
                target_id.to_string()
            } else {
                id.to_string()
            }
        };
        let transferred: Vec<Edge> = self
            .relations
            .incident_edges(source_id)
            .into_iter()
            .map(|edge| {
                Edge::new(
                    substitute(&edge.source_id),
                    substitute(&edge.target_id),
                    edge.relationship,
                    edge.metadata.clone(),
                )
            })
            .collect();

        if let Some(target) = self.nodes.peek_mut(target_id) {
            target.content = format!("{}\n\n{}", target.content, source.content);
            for (key, value) in source.metadata {
                target.metadata.insert(key, value);
            }
            target.importance = target.importance.max(source.importance);
            target.access_count += source.access_count;
            target.updated_at = Utc::now();
        }

        let edges_transferred = transferred.len();
        for edge in transferred {
            self.relations.add_edge(&self.nodes, edge)?;
        }

        self.relations.remove_node(source_id);
        self.nodes.remove(source_id);

        tracing::info!(
            source = %source_id,
            target = %target_id,
            edges_transferred,
            "nodes merged"
        );

        Ok(MergeResult {
            target_id: target_id.to_string(),
            removed_id: source_id.to_string(),
            edges_transferred,
        })
    }
}
