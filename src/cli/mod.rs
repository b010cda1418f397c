//! Terminal front end. Each command loads the graph, acts, and saves again
//! when it mutated anything.

pub mod add;
pub mod doctor;
pub mod export;
pub mod forget;
pub mod import;
pub mod inspect;
pub mod link;
pub mod merge;
pub mod reset;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};

use crate::config::CairnConfig;
use crate::db::persist::Storage;
use crate::graph::types::{Metadata, MemoryNode};
use crate::graph::GraphHandle;

/// Open storage and load the persisted graph into a fresh handle.
pub fn open_graph(config: &CairnConfig) -> Result<(GraphHandle, Storage)> {
    let storage = Storage::open(config)?;
    let graph = GraphHandle::default();
    graph.load(&storage).context("failed to load memory graph")?;
    Ok((graph, storage))
}

/// Persist the graph, reporting the row counts on stderr.
pub fn save_graph(graph: &GraphHandle, storage: &mut Storage) -> Result<()> {
    let summary = graph.save(storage).context("failed to save memory graph")?;
    eprintln!("Saved {} nodes and {} edges.", summary.nodes, summary.edges);
    Ok(())
}

/// Parse an optional JSON object given on the command line.
pub fn parse_metadata(raw: Option<&str>) -> Result<Metadata> {
    match raw {
        Some(json) => serde_json::from_str(json).context("metadata must be a JSON object"),
        None => Ok(Metadata::new()),
    }
}

/// First `max` characters of `content`, with an ellipsis when truncated.
pub fn preview(content: &str, max: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Print a numbered result list the way `search`, `context` and `related` share.
pub fn print_nodes(nodes: &[MemoryNode]) {
    if nodes.is_empty() {
        println!("No results found.");
        return;
    }

    println!("Found {} node(s)\n", nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        println!(
            "  {}. [{}] {} (importance: {:.2}, accesses: {})",
            i + 1,
            node.node_type,
            node.id,
            node.importance,
            node.access_count,
        );
        println!("     {}", preview(&node.content, 120));
        println!();
    }
}
