use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddMemoryParams {
    #[schemars(description = "The natural language content of the memory")]
    pub content: String,

    #[schemars(
        description = "Node type: 'entity', 'event', 'concept', 'relationship', 'task' or 'context'. Defaults to 'context'."
    )]
    pub node_type: Option<String>,

    #[schemars(description = "Importance score 0.0-1.0. Defaults to 0.5.")]
    pub importance: Option<f64>,

    #[schemars(description = "Optional JSON object of metadata")]
    pub metadata: Option<serde_json::Value>,
}
