use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InspectNodeParams {
    #[schemars(description = "ID of the node to inspect")]
    pub id: String,

    #[schemars(description = "If true, include the node's incoming and outgoing edges")]
    pub include_edges: Option<bool>,
}
