//! Core graph type definitions.
//!
//! Defines [`NodeType`] (the closed set of node categories), [`RelationshipType`]
//! (edge labels), [`MemoryNode`] (a stored unit of knowledge), [`Edge`] (a directed,
//! typed, possibly duplicated link), and [`GraphDocument`] (the flat JSON form of a
//! whole graph used for backups and export).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Free-form JSON metadata attached to nodes and edges.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Default importance for nodes created without an explicit value.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Category of a memory node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Person, place, thing.
    Entity,
    /// Something that happened, including recorded skill executions.
    Event,
    /// Abstract idea.
    Concept,
    /// A node standing for a connection between entities.
    Relationship,
    /// Action item.
    Task,
    /// Conversation context. The default for manually added memories.
    Context,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        Self::Entity,
        Self::Event,
        Self::Concept,
        Self::Relationship,
        Self::Task,
        Self::Context,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Event => "event",
            Self::Concept => "concept",
            Self::Relationship => "relationship",
            Self::Task => "task",
            Self::Context => "context",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entity" => Ok(Self::Entity),
            "event" => Ok(Self::Event),
            "concept" => Ok(Self::Concept),
            "relationship" => Ok(Self::Relationship),
            "task" => Ok(Self::Task),
            "context" => Ok(Self::Context),
            _ => Err(GraphError::validation(format!("unknown node type: {s}"))),
        }
    }
}

/// Label on a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    RelatedTo,
    PartOf,
    CausedBy,
    HappenedBefore,
    Involves,
    Created,
    Updated,
    SimilarTo,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 8] = [
        Self::RelatedTo,
        Self::PartOf,
        Self::CausedBy,
        Self::HappenedBefore,
        Self::Involves,
        Self::Created,
        Self::Updated,
        Self::SimilarTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelatedTo => "related_to",
            Self::PartOf => "part_of",
            Self::CausedBy => "caused_by",
            Self::HappenedBefore => "happened_before",
            Self::Involves => "involves",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::SimilarTo => "similar_to",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "related_to" => Ok(Self::RelatedTo),
            "part_of" => Ok(Self::PartOf),
            "caused_by" => Ok(Self::CausedBy),
            "happened_before" => Ok(Self::HappenedBefore),
            "involves" => Ok(Self::Involves),
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "similar_to" => Ok(Self::SimilarTo),
            _ => Err(GraphError::validation(format!(
                "unknown relationship type: {s}"
            ))),
        }
    }
}

/// A node in the memory graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Opaque unique id, immutable.
    pub id: String,
    /// Category of this node, immutable.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Free text content.
    pub content: String,
    /// Arbitrary JSON metadata. Updates merge keys rather than replacing the map.
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever content or metadata changes.
    pub updated_at: DateTime<Utc>,
    /// Relevance weight in `[0.0, 1.0]`.
    #[serde(default = "default_importance")]
    pub importance: f64,
    /// Number of times this node was fetched by id.
    #[serde(default)]
    pub access_count: u64,
    /// Time of the last fetch by id, or `None` if never fetched.
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
}

fn default_importance() -> f64 {
    DEFAULT_IMPORTANCE
}

impl MemoryNode {
    /// Create a node stamped with the current time.
    ///
    /// Fails with [`GraphError::Validation`] if `importance` is outside `[0.0, 1.0]`.
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        content: impl Into<String>,
        importance: f64,
    ) -> Result<Self> {
        validate_importance(importance)?;
        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            node_type,
            content: content.into(),
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
            importance,
            access_count: 0,
            last_accessed: None,
        })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Re-check invariants on a node that was built field by field
    /// (deserialized from storage or a backup document).
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(GraphError::validation("node id must not be empty"));
        }
        validate_importance(self.importance)
    }

    /// Record a fetch: bump `access_count` and `last_accessed`.
    pub fn access(&mut self) {
        self.access_count += 1;
        self.last_accessed = Some(Utc::now());
    }

    /// Replace content and/or merge metadata keys, then bump `updated_at`.
    ///
    /// Empty content counts as no content and leaves the current text alone.
    pub fn update(&mut self, content: Option<&str>, metadata: Option<&Metadata>) {
        if let Some(content) = content.filter(|c| !c.is_empty()) {
            self.content = content.to_string();
        }
        if let Some(metadata) = metadata {
            for (key, value) in metadata {
                self.metadata.insert(key.clone(), value.clone());
            }
        }
        self.updated_at = Utc::now();
    }

    /// Seconds elapsed between `updated_at` and `now`.
    pub fn seconds_since_update(&self, now: DateTime<Utc>) -> f64 {
        (now - self.updated_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Reject importance values outside `[0.0, 1.0]` (NaN included).
pub fn validate_importance(importance: f64) -> Result<()> {
    if (0.0..=1.0).contains(&importance) {
        Ok(())
    } else {
        Err(GraphError::validation(format!(
            "importance must be between 0.0 and 1.0, got {importance}"
        )))
    }
}

/// A directed, typed edge. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(alias = "source")]
    pub source_id: String,
    #[serde(alias = "target")]
    pub target_id: String,
    pub relationship: RelationshipType,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship: RelationshipType,
        metadata: Metadata,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship,
            metadata,
            created_at: Utc::now(),
        }
    }
}

/// Full-graph JSON document: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<MemoryNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}
