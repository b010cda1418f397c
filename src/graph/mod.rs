//! The memory graph engine.
//!
//! [`MemoryGraph`] is the only owner of the [`NodeStore`] and [`RelationStore`];
//! everything outside this module sees nodes and edges as cloned snapshots.
//! Search and context assembly live in [`search`], merging in [`merge`],
//! deletion in [`forget`], and counters in [`stats`]. [`GraphHandle`] wraps an
//! engine in a reader-writer lock for shared use.

pub mod forget;
pub mod handle;
pub mod merge;
pub mod nodes;
pub mod relations;
pub mod search;
pub mod stats;
pub mod types;

pub use handle::GraphHandle;

use nodes::NodeStore;
use relations::RelationStore;
use types::{validate_importance, Edge, GraphDocument, Metadata, MemoryNode, RelationshipType};

use crate::error::{GraphError, Result};

/// Summary of merging a [`GraphDocument`] into an existing graph.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub nodes_imported: usize,
    /// Nodes whose id already existed.
    pub nodes_skipped: usize,
    pub edges_imported: usize,
    /// Edges with a missing endpoint.
    pub edges_skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: NodeStore,
    relations: RelationStore,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; it is queryable immediately.
    ///
    /// An existing node with the same id is overwritten (last write wins); its
    /// edges are kept. Fails only if the node violates its invariants.
    pub fn add_node(&mut self, node: MemoryNode) -> Result<()> {
        node.validate()?;
        let id = node.id.clone();
        let node_type = node.node_type;
        if let Some(previous) = self.nodes.insert(node) {
            tracing::warn!(id = %id, previous_type = %previous.node_type, "node overwritten");
        } else {
            tracing::debug!(id = %id, node_type = %node_type, "node added");
        }
        Ok(())
    }

    /// Fetch a node snapshot by id.
    ///
    /// **Read with side effect:** each call increments the stored node's
    /// `access_count` by exactly one and sets `last_accessed`. The returned
    /// snapshot already reflects the increment. Use [`MemoryGraph::peek_node`]
    /// when the access must not be counted.
    pub fn get_node(&mut self, id: &str) -> Result<MemoryNode> {
        self.nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::not_found(id))
    }

    /// Borrow a node without counting an access.
    pub fn peek_node(&self, id: &str) -> Option<&MemoryNode> {
        self.nodes.peek(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Add a directed edge stamped with the current time.
    pub fn add_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        metadata: Metadata,
    ) -> Result<()> {
        self.insert_edge(Edge::new(source_id, target_id, relationship, metadata))
    }

    /// Add a fully formed edge, keeping its `created_at`. Used when hydrating.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        tracing::debug!(
            source = %edge.source_id,
            target = %edge.target_id,
            relationship = %edge.relationship,
            "adding edge"
        );
        self.relations.add_edge(&self.nodes, edge)
    }

    /// Every edge from `source_id` to `target_id`, oldest first.
    pub fn edges_between(&self, source_id: &str, target_id: &str) -> Vec<Edge> {
        self.relations
            .edges_between(source_id, target_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Replace content (if non-empty) and/or merge metadata; bumps `updated_at`.
    pub fn update_node(
        &mut self,
        id: &str,
        content: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<MemoryNode> {
        let node = self
            .nodes
            .peek_mut(id)
            .ok_or_else(|| GraphError::not_found(id))?;
        node.update(content, metadata);
        Ok(node.clone())
    }

    /// Explicitly set a node's importance.
    pub fn set_importance(&mut self, id: &str, importance: f64) -> Result<MemoryNode> {
        validate_importance(importance)?;
        let node = self
            .nodes
            .peek_mut(id)
            .ok_or_else(|| GraphError::not_found(id))?;
        node.importance = importance;
        Ok(node.clone())
    }

    /// All nodes, in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &MemoryNode> + '_ {
        self.nodes.iter()
    }

    /// All edges, oldest first.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.relations.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outgoing_edges(&self, id: &str) -> Vec<Edge> {
        self.relations.outgoing_edges(id).cloned().collect()
    }

    /// Edges arriving at `id`, in insertion order.
    pub fn incoming_edges(&self, id: &str) -> Vec<Edge> {
        self.relations.incoming_edges(id).cloned().collect()
    }

    /// Flatten the graph into its JSON document form.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.iter().cloned().collect(),
            edges: self.relations.iter().cloned().collect(),
        }
    }

    /// Rebuild a graph from a document: nodes first, then edges.
    ///
    /// Strict: an invalid node or an edge with a missing endpoint fails the
    /// whole rebuild.
    pub fn from_document(doc: GraphDocument) -> Result<Self> {
        let mut graph = Self::new();
        for node in doc.nodes {
            graph.add_node(node)?;
        }
        for edge in doc.edges {
            graph.insert_edge(edge)?;
        }
        Ok(graph)
    }

    /// Merge a document into this graph without overwriting anything.
    ///
    /// Nodes whose id already exists are skipped; edges whose endpoints are
    /// missing after the node pass are skipped.
    pub fn import_document(&mut self, doc: GraphDocument) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for node in doc.nodes {
            if self.nodes.contains(&node.id) {
                summary.nodes_skipped += 1;
                continue;
            }
            self.add_node(node)?;
            summary.nodes_imported += 1;
        }
        for edge in doc.edges {
            match self.insert_edge(edge) {
                Ok(()) => summary.edges_imported += 1,
                Err(GraphError::Validation(reason)) => {
                    tracing::warn!(%reason, "skipping edge during import");
                    summary.edges_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }
}
