//! CLI retrieval commands: `search`, `context` and `related`.
//!
//! Retrieval never counts as an access, so none of these save.

use anyhow::Result;

use crate::config::CairnConfig;
use crate::graph::types::NodeType;

/// Keyword search over node content, best first.
pub fn search(
    config: &CairnConfig,
    query: Option<&str>,
    node_type: Option<NodeType>,
    limit: Option<usize>,
) -> Result<()> {
    let (graph, _storage) = super::open_graph(config)?;
    let limit = limit.unwrap_or(config.retrieval.default_search_limit);
    let results = graph.find_nodes(query, node_type, limit);
    super::print_nodes(&results);
    Ok(())
}

/// Matches for `query` plus their direct neighbors, ranked.
pub fn context(config: &CairnConfig, query: &str, max_nodes: Option<usize>) -> Result<()> {
    let (graph, _storage) = super::open_graph(config)?;
    let max_nodes = max_nodes.unwrap_or(config.retrieval.default_context_nodes);
    let results = graph.context(query, max_nodes);
    super::print_nodes(&results);
    Ok(())
}

/// Nodes within `depth` hops of `id` in either direction.
pub fn related(config: &CairnConfig, id: &str, depth: usize) -> Result<()> {
    let (graph, _storage) = super::open_graph(config)?;
    if graph.peek_node(id).is_none() {
        anyhow::bail!("node not found: {id}");
    }
    let results = graph.related_nodes(id, depth);
    super::print_nodes(&results);
    Ok(())
}
