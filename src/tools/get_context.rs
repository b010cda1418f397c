//! MCP `get_context` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get_context` MCP tool.
///
/// Context is the keyword matches for `query` plus their direct neighbors,
/// ranked by importance, then access count.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetContextParams {
    #[schemars(description = "Query whose matches seed the context")]
    pub query: String,

    #[schemars(description = "Maximum number of nodes to return. Defaults to 20.")]
    pub max_nodes: Option<usize>,
}
