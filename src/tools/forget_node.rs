use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ForgetNodeParams {
    #[schemars(description = "ID of the node to delete along with all its edges")]
    pub id: String,
}
