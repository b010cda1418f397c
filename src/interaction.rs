//! Collaborator-facing write operations.
//!
//! [`add_memory`] is how callers store a new memory without picking an id.
//! [`record_interaction`] is called after an action executor ("skill") runs:
//! the outcome becomes an `event` node linked to the context that was relevant
//! to the originating query. Neither persists anything; saving is the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::types::{Metadata, MemoryNode, NodeType, RelationshipType};
use crate::graph::MemoryGraph;

/// How an executor run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success { result: serde_json::Value },
    Error { error: String },
}

impl ExecutionOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Error { .. } => "error",
        }
    }
}

/// What an executor reports back: `{"skill": ..., "status": ..., "result"|"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub skill: String,
    #[serde(flatten)]
    pub outcome: ExecutionOutcome,
}

impl ExecutionReport {
    pub fn success(skill: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            skill: skill.into(),
            outcome: ExecutionOutcome::Success { result },
        }
    }

    pub fn error(skill: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            outcome: ExecutionOutcome::Error {
                error: error.into(),
            },
        }
    }
}

/// Store a new memory under a generated `memory_<uuid>` id and return the id.
pub fn add_memory(
    graph: &mut MemoryGraph,
    content: &str,
    node_type: NodeType,
    metadata: Metadata,
    importance: f64,
) -> Result<String> {
    let id = format!("memory_{}", uuid::Uuid::new_v4());
    let node = MemoryNode::new(&id, node_type, content, importance)?.with_metadata(metadata);
    graph.add_node(node)?;

    tracing::info!(id = %id, node_type = %node_type, "memory added");
    Ok(id)
}

/// Record an executor run as an `event` node and return its id.
///
/// The context for `query` (up to `link_limit` nodes) is computed before the
/// event node is inserted, and each context node gets a `related_to` edge
/// pointing at the new event.
pub fn record_interaction(
    graph: &mut MemoryGraph,
    query: &str,
    report: &ExecutionReport,
    link_limit: usize,
    importance: f64,
) -> Result<String> {
    let related = graph.context(query, link_limit);

    let id = format!("interaction_{}", uuid::Uuid::now_v7());
    let outcome_line = match &report.outcome {
        ExecutionOutcome::Success { result } => format!("Result: {result}"),
        ExecutionOutcome::Error { error } => format!("Error: {error}"),
    };
    let content = format!(
        "User query: {query}\nSkill executed: {}\n{outcome_line}",
        report.skill
    );

    let mut metadata = Metadata::new();
    metadata.insert("skill".into(), report.skill.clone().into());
    metadata.insert("status".into(), report.outcome.status().into());
    match &report.outcome {
        ExecutionOutcome::Success { result } => {
            metadata.insert("result".into(), result.clone());
        }
        ExecutionOutcome::Error { error } => {
            metadata.insert("error".into(), error.clone().into());
        }
    }

    let node = MemoryNode::new(&id, NodeType::Event, content, importance)?.with_metadata(metadata);
    graph.add_node(node)?;

    for node in &related {
        graph.add_edge(&node.id, &id, RelationshipType::RelatedTo, Metadata::new())?;
    }

    tracing::info!(
        id = %id,
        skill = %report.skill,
        status = report.outcome.status(),
        linked = related.len(),
        "interaction recorded"
    );
    Ok(id)
}
