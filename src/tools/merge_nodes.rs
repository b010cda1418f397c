use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MergeNodesParams {
    #[schemars(description = "ID of the node to fold in and delete")]
    pub source_id: String,

    #[schemars(description = "ID of the node that survives the merge")]
    pub target_id: String,
}
