//! Shared, lock-guarded access to a [`MemoryGraph`].
//!
//! One engine-wide reader-writer lock: mutations (including [`GraphHandle::get_node`],
//! which bumps access statistics) take it exclusively, searches share it, and
//! [`GraphHandle::save`] / [`GraphHandle::load`] hold it exclusively for their
//! whole duration. Nothing is cancellable and nothing times out.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

use super::forget::ForgetResult;
use super::merge::MergeResult;
use super::stats::StatsResponse;
use super::types::{GraphDocument, Metadata, MemoryNode, NodeType, RelationshipType};
use super::MemoryGraph;
use crate::db::persist::{SaveSummary, Storage};
use crate::error::Result;
use crate::interaction::{self, ExecutionReport};

#[derive(Debug, Clone, Default)]
pub struct GraphHandle {
    inner: Arc<RwLock<MemoryGraph>>,
}

impl GraphHandle {
    pub fn new(graph: MemoryGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Shared access for multi-step reads.
    pub fn read(&self) -> RwLockReadGuard<'_, MemoryGraph> {
        self.inner.read()
    }

    /// Exclusive access for multi-step mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, MemoryGraph> {
        self.inner.write()
    }

    pub fn add_node(&self, node: MemoryNode) -> Result<()> {
        self.inner.write().add_node(node)
    }

    /// Fetch a node by id. Counts as an access (see [`MemoryGraph::get_node`]).
    pub fn get_node(&self, id: &str) -> Result<MemoryNode> {
        self.inner.write().get_node(id)
    }

    /// Fetch a node without counting an access.
    pub fn peek_node(&self, id: &str) -> Option<MemoryNode> {
        self.inner.read().peek_node(id).cloned()
    }

    pub fn add_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        metadata: Metadata,
    ) -> Result<()> {
        self.inner
            .write()
            .add_edge(source_id, target_id, relationship, metadata)
    }

    pub fn update_node(
        &self,
        id: &str,
        content: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<MemoryNode> {
        self.inner.write().update_node(id, content, metadata)
    }

    pub fn merge_nodes(&self, source_id: &str, target_id: &str) -> Result<MergeResult> {
        self.inner.write().merge_nodes(source_id, target_id)
    }

    pub fn remove_node(&self, id: &str) -> Result<ForgetResult> {
        self.inner.write().remove_node(id)
    }

    pub fn find_nodes(
        &self,
        query: Option<&str>,
        node_type: Option<NodeType>,
        limit: usize,
    ) -> Vec<MemoryNode> {
        self.inner.read().find_nodes(query, node_type, limit)
    }

    pub fn related_nodes(&self, id: &str, depth: usize) -> Vec<MemoryNode> {
        self.inner.read().related_nodes(id, depth)
    }

    pub fn context(&self, query: &str, max_nodes: usize) -> Vec<MemoryNode> {
        self.inner.read().context(query, max_nodes)
    }

    pub fn stats(&self) -> StatsResponse {
        self.inner.read().stats()
    }

    pub fn snapshot(&self) -> GraphDocument {
        self.inner.read().to_document()
    }

    /// See [`interaction::add_memory`].
    pub fn add_memory(
        &self,
        content: &str,
        node_type: NodeType,
        metadata: Metadata,
        importance: f64,
    ) -> Result<String> {
        interaction::add_memory(&mut self.inner.write(), content, node_type, metadata, importance)
    }

    /// See [`interaction::record_interaction`].
    pub fn record_interaction(
        &self,
        query: &str,
        report: &ExecutionReport,
        link_limit: usize,
        importance: f64,
    ) -> Result<String> {
        interaction::record_interaction(
            &mut self.inner.write(),
            query,
            report,
            link_limit,
            importance,
        )
    }

    /// Persist the whole graph, holding the exclusive lock throughout.
    pub fn save(&self, storage: &mut Storage) -> Result<SaveSummary> {
        let graph = self.inner.write();
        storage.save_all(&graph)
    }

    /// Replace the in-memory graph with the persisted one, holding the
    /// exclusive lock throughout. On error the current graph is left untouched.
    pub fn load(&self, storage: &Storage) -> Result<()> {
        let mut graph = self.inner.write();
        *graph = storage.load_all()?;
        Ok(())
    }
}
