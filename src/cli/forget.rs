use anyhow::Result;

use crate::config::CairnConfig;

/// Delete a node and every edge touching it.
pub fn forget(config: &CairnConfig, id: &str) -> Result<()> {
    let (graph, mut storage) = super::open_graph(config)?;
    let result = graph.remove_node(id)?;
    super::save_graph(&graph, &mut storage)?;

    println!("Forgot {} ({} edge(s) removed).", result.id, result.edges_removed);
    Ok(())
}
