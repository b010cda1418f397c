pub mod add_memory;
pub mod forget_node;
pub mod get_context;
pub mod inspect_node;
pub mod link_nodes;
pub mod memory_stats;
pub mod merge_nodes;
pub mod record_interaction;
pub mod related_nodes;
pub mod search_memory;

use add_memory::AddMemoryParams;
use forget_node::ForgetNodeParams;
use get_context::GetContextParams;
use inspect_node::InspectNodeParams;
use link_nodes::LinkNodesParams;
use memory_stats::MemoryStatsParams;
use merge_nodes::MergeNodesParams;
use record_interaction::RecordInteractionParams;
use related_nodes::RelatedNodesParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_memory::SearchMemoryParams;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use crate::config::CairnConfig;
use crate::db::persist::Storage;
use crate::error::GraphError;
use crate::graph::types::{Metadata, MemoryNode, NodeType, RelationshipType};
use crate::graph::GraphHandle;

/// The Cairn MCP tool handler. Holds the shared graph, its storage and the
/// config, and exposes all MCP tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct CairnTools {
    tool_router: ToolRouter<Self>,
    graph: GraphHandle,
    storage: Arc<Mutex<Storage>>,
    config: Arc<CairnConfig>,
}

#[tool_router]
impl CairnTools {
    pub fn new(graph: GraphHandle, storage: Arc<Mutex<Storage>>, config: Arc<CairnConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            graph,
            storage,
            config,
        }
    }

    /// Store a new memory node.
    #[tool(description = "Store a new memory node. Types: entity, event, concept, relationship, task, context (default). Returns the generated id.")]
    async fn add_memory(
        &self,
        Parameters(params): Parameters<AddMemoryParams>,
    ) -> Result<String, String> {
        let node_type = match params.node_type.as_deref() {
            Some(t) => t.parse::<NodeType>().map_err(|e| e.to_string())?,
            None => NodeType::Context,
        };
        let importance = params
            .importance
            .unwrap_or(self.config.retrieval.default_importance);
        let metadata = metadata_object(params.metadata)?;

        tracing::info!(
            content_len = params.content.len(),
            node_type = %node_type,
            "add_memory called"
        );

        let content = params.content;
        let id = self
            .mutate(move |graph| graph.add_memory(&content, node_type, metadata, importance))
            .await?;

        to_json(&json!({ "id": id }))
    }

    /// Keyword search over node content.
    #[tool(description = "Search memory nodes whose content contains the query (case-insensitive). Results are ranked by importance, then access count.")]
    async fn search_memory(
        &self,
        Parameters(params): Parameters<SearchMemoryParams>,
    ) -> Result<String, String> {
        let node_type = params
            .node_type
            .as_deref()
            .map(str::parse::<NodeType>)
            .transpose()
            .map_err(|e| e.to_string())?;
        let limit = params
            .limit
            .unwrap_or(self.config.retrieval.default_search_limit);

        tracing::info!(query = %params.query, limit, "search_memory called");

        let query = params.query;
        let nodes = self
            .read(move |graph| Ok(graph.find_nodes(Some(&query), node_type, limit)))
            .await?;
        node_list(&nodes)
    }

    /// Assemble context for a query.
    #[tool(description = "Get the context for a query: matching nodes plus their direct neighbors, ranked by importance and access count.")]
    async fn get_context(
        &self,
        Parameters(params): Parameters<GetContextParams>,
    ) -> Result<String, String> {
        let max_nodes = params
            .max_nodes
            .unwrap_or(self.config.retrieval.default_context_nodes);

        tracing::info!(query = %params.query, max_nodes, "get_context called");

        let query = params.query;
        let nodes = self
            .read(move |graph| Ok(graph.context(&query, max_nodes)))
            .await?;
        node_list(&nodes)
    }

    /// Inspect a node by ID. Counts as an access.
    #[tool(description = "Inspect a node by ID. Returns full content and metadata, and optionally its edges. Counts as an access.")]
    async fn inspect_node(
        &self,
        Parameters(params): Parameters<InspectNodeParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "inspect_node called");

        let include_edges = params.include_edges.unwrap_or(false);
        let id = params.id;
        let response = self
            .mutate(move |graph| {
                let node = graph.get_node(&id)?;
                if !include_edges {
                    return Ok(json!({ "node": node }));
                }
                let g = graph.read();
                Ok(json!({
                    "node": node,
                    "outgoing": g.outgoing_edges(&id),
                    "incoming": g.incoming_edges(&id),
                }))
            })
            .await?;
        to_json(&response)
    }

    /// Create a directed edge between two nodes.
    #[tool(description = "Create a directed edge between two existing nodes (e.g. 'part_of', 'caused_by', 'involves'). Parallel edges are allowed.")]
    async fn link_nodes(
        &self,
        Parameters(params): Parameters<LinkNodesParams>,
    ) -> Result<String, String> {
        let relationship = match params.relationship.as_deref() {
            Some(r) => r.parse::<RelationshipType>().map_err(|e| e.to_string())?,
            None => RelationshipType::RelatedTo,
        };
        let metadata = metadata_object(params.metadata)?;

        tracing::info!(
            source = %params.source_id,
            relationship = %relationship,
            target = %params.target_id,
            "link_nodes called"
        );

        let (source_id, target_id) = (params.source_id, params.target_id);
        let response = self
            .mutate(move |graph| {
                graph.add_edge(&source_id, &target_id, relationship, metadata)?;
                Ok(json!({
                    "source_id": source_id,
                    "target_id": target_id,
                    "relationship": relationship,
                }))
            })
            .await?;
        to_json(&response)
    }

    /// Nodes reachable within a bounded number of hops.
    #[tool(description = "List nodes within `depth` hops (default 1, at most 2) of a node, following edges in either direction.")]
    async fn related_nodes(
        &self,
        Parameters(params): Parameters<RelatedNodesParams>,
    ) -> Result<String, String> {
        let depth = params.depth.unwrap_or(1);
        tracing::info!(id = %params.id, depth, "related_nodes called");

        let id = params.id;
        let nodes = self
            .read(move |graph| {
                let g = graph.read();
                if !g.contains(&id) {
                    return Err(GraphError::not_found(id));
                }
                Ok(g.related_nodes(&id, depth))
            })
            .await?;
        node_list(&nodes)
    }

    /// Merge one node into another.
    #[tool(description = "Merge source into target: content is appended, metadata merged (source wins), importance is the max, access counts are summed and edges are copied to the target (duplicates kept). The source node is deleted.")]
    async fn merge_nodes(
        &self,
        Parameters(params): Parameters<MergeNodesParams>,
    ) -> Result<String, String> {
        tracing::info!(source = %params.source_id, target = %params.target_id, "merge_nodes called");

        let result = self
            .mutate(move |graph| graph.merge_nodes(&params.source_id, &params.target_id))
            .await?;
        to_json(&result)
    }

    /// Delete a node and its edges.
    #[tool(description = "Delete a node by ID together with every edge touching it.")]
    async fn forget_node(
        &self,
        Parameters(params): Parameters<ForgetNodeParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "forget_node called");

        let result = self.mutate(move |graph| graph.remove_node(&params.id)).await?;
        to_json(&result)
    }

    /// Record the outcome of a skill run as an event.
    #[tool(description = "Record a skill run as an event node linked to the context of the originating query. Set `error` for a failed run, otherwise `result`.")]
    async fn record_interaction(
        &self,
        Parameters(params): Parameters<RecordInteractionParams>,
    ) -> Result<String, String> {
        let report = params.report();
        tracing::info!(
            skill = %report.skill,
            status = report.outcome.status(),
            "record_interaction called"
        );

        let link_limit = self.config.retrieval.interaction_context_nodes;
        let importance = self.config.retrieval.interaction_importance;
        let query = params.query;
        let id = self
            .mutate(move |graph| graph.record_interaction(&query, &report, link_limit, importance))
            .await?;

        to_json(&json!({ "id": id }))
    }

    /// Get statistics about the memory graph.
    #[tool(description = "Get memory graph statistics: node and edge counts, breakdowns by node type and relationship, total accesses.")]
    async fn memory_stats(
        &self,
        Parameters(_params): Parameters<MemoryStatsParams>,
    ) -> Result<String, String> {
        tracing::info!("memory_stats called");

        let stats = self.read(|graph| Ok(graph.stats())).await?;
        to_json(&stats)
    }
}

impl CairnTools {
    /// Run a read-only graph operation off the async runtime.
    async fn read<T, F>(&self, op: F) -> Result<T, String>
    where
        F: FnOnce(&GraphHandle) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let graph = self.graph.clone();
        tokio::task::spawn_blocking(move || op(&graph))
            .await
            .map_err(|e| format!("graph task failed: {e}"))?
            .map_err(|e| e.to_string())
    }

    /// Run a mutating graph operation, then save the whole graph before answering.
    ///
    /// A failed save is reported even though the in-memory change stands.
    async fn mutate<T, F>(&self, op: F) -> Result<T, String>
    where
        F: FnOnce(&GraphHandle) -> crate::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let graph = self.graph.clone();
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let value = op(&graph)?;
            let mut storage = storage
                .lock()
                .map_err(|e| GraphError::persistence(format!("storage lock poisoned: {e}")))?;
            graph.save(&mut storage)?;
            Ok::<T, GraphError>(value)
        })
        .await
        .map_err(|e| format!("graph task failed: {e}"))?
        .map_err(|e| e.to_string())
    }
}

fn metadata_object(value: Option<Value>) -> Result<Metadata, String> {
    match value {
        None | Some(Value::Null) => Ok(Metadata::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(format!("metadata must be a JSON object, got {other}")),
    }
}

fn node_list(nodes: &[MemoryNode]) -> Result<String, String> {
    to_json(&json!({ "nodes": nodes, "total": nodes.len() }))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

#[tool_handler]
impl ServerHandler for CairnTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Cairn is a memory graph server. Use add_memory to store nodes, link_nodes to \
                 connect them, get_context or search_memory to retrieve, and record_interaction \
                 to log skill runs."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
