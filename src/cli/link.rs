use anyhow::Result;

use crate::config::CairnConfig;
use crate::graph::types::RelationshipType;

/// Add a directed edge between two existing nodes.
pub fn link(
    config: &CairnConfig,
    source: &str,
    target: &str,
    relationship: RelationshipType,
    metadata: Option<&str>,
) -> Result<()> {
    let metadata = super::parse_metadata(metadata)?;

    let (graph, mut storage) = super::open_graph(config)?;
    graph.add_edge(source, target, relationship, metadata)?;
    super::save_graph(&graph, &mut storage)?;

    println!("{source} --[{relationship}]--> {target}");
    Ok(())
}
