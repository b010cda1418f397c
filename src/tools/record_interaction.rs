//! MCP `record_interaction` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::interaction::ExecutionReport;

/// Parameters for the `record_interaction` MCP tool.
///
/// Describes one skill run. A run with `error` set is recorded as failed;
/// otherwise `result` (or null) is recorded as its output.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecordInteractionParams {
    #[schemars(description = "The user query that triggered the skill")]
    pub query: String,

    #[schemars(description = "Name of the skill that ran")]
    pub skill: String,

    #[schemars(description = "JSON result of a successful run")]
    pub result: Option<serde_json::Value>,

    #[schemars(description = "Error message of a failed run")]
    pub error: Option<String>,
}

impl RecordInteractionParams {
    pub fn report(&self) -> ExecutionReport {
        match &self.error {
            Some(error) => ExecutionReport::error(&self.skill, error),
            None => ExecutionReport::success(
                &self.skill,
                self.result.clone().unwrap_or(serde_json::Value::Null),
            ),
        }
    }
}
