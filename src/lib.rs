//! Persistent memory graph for AI assistants.
//!
//! Cairn keeps what an assistant learns as a directed, typed multigraph of
//! memory nodes. Each node carries content, a type, free-form metadata, an
//! importance score and access statistics. Edges are typed relationships, and
//! the same relationship may connect a pair of nodes more than once.
//!
//! | Node type | Typical content |
//! |-----------|-----------------|
//! | **entity** | People, places, projects |
//! | **event** | Meetings, recorded skill runs |
//! | **concept** | Facts, preferences |
//! | **relationship** | Reified links worth their own node |
//! | **task** | Things to do |
//! | **context** | Anything else (the default) |
//!
//! # Architecture
//!
//! - **Engine**: in-memory graph with keyword search, bounded neighborhood
//!   traversal, ranked context assembly, merge and delete
//! - **Concurrency**: one reader-writer lock around the whole graph
//! - **Storage**: SQLite as the primary store, replaced wholesale on each save
//!   inside one transaction, plus a JSON document backup
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, whole-graph persistence and health checks
//! - [`error`]: the crate-wide error type
//! - [`graph`]: the memory graph engine and its shared handle
//! - [`interaction`]: storing memories and recording skill runs

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod interaction;

pub use error::{GraphError, Result};
pub use graph::types::{Edge, GraphDocument, Metadata, MemoryNode, NodeType, RelationshipType};
pub use graph::{GraphHandle, MemoryGraph};
