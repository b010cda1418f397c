use anyhow::Result;

use crate::config::CairnConfig;

/// Fold `source` into `target` and delete `source`.
pub fn merge(config: &CairnConfig, source: &str, target: &str) -> Result<()> {
    let (graph, mut storage) = super::open_graph(config)?;
    let result = graph.merge_nodes(source, target)?;
    super::save_graph(&graph, &mut storage)?;

    println!(
        "Merged {} into {} ({} edge(s) transferred).",
        result.removed_id, result.target_id, result.edges_transferred
    );
    Ok(())
}
