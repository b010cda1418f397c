use anyhow::Result;

use crate::config::CairnConfig;
use crate::graph::types::NodeType;

/// Store a new memory and print its generated id.
pub fn add(
    config: &CairnConfig,
    content: &str,
    node_type: NodeType,
    importance: Option<f64>,
    metadata: Option<&str>,
) -> Result<()> {
    let metadata = super::parse_metadata(metadata)?;
    let importance = importance.unwrap_or(config.retrieval.default_importance);

    let (graph, mut storage) = super::open_graph(config)?;
    let id = graph.add_memory(content, node_type, metadata, importance)?;
    super::save_graph(&graph, &mut storage)?;

    println!("{id}");
    Ok(())
}
