//! MCP `link_nodes` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `link_nodes` MCP tool.
///
/// Creates a directed edge between two existing nodes. Repeating the call
/// creates a parallel edge.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LinkNodesParams {
    /// ID of the edge's source node.
    #[schemars(description = "ID of the source node")]
    pub source_id: String,

    /// ID of the edge's target node.
    #[schemars(description = "ID of the target node")]
    pub target_id: String,

    #[schemars(
        description = "Relationship: 'related_to', 'part_of', 'caused_by', 'happened_before', 'involves', 'created', 'updated' or 'similar_to'. Defaults to 'related_to'."
    )]
    pub relationship: Option<String>,

    #[schemars(description = "Optional JSON object of edge metadata")]
    pub metadata: Option<serde_json::Value>,
}
