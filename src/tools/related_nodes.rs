use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RelatedNodesParams {
    #[schemars(description = "ID of the node to start from")]
    pub id: String,

    #[schemars(description = "Hops to follow in either direction, 0-2. Defaults to 1; larger values act as 2.")]
    pub depth: Option<usize>,
}
