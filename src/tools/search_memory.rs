use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryParams {
    #[schemars(description = "Case-insensitive substring to look for in node content. Empty matches everything.")]
    pub query: String,

    #[schemars(description = "Optional node type filter")]
    pub node_type: Option<String>,

    #[schemars(description = "Maximum number of results. Defaults to 10.")]
    pub limit: Option<usize>,
}
