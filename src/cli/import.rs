use anyhow::{Context, Result};
use std::path::Path;

use crate::config::CairnConfig;

/// Import nodes and edges from a JSON document file.
///
/// Nodes whose ID already exists are skipped. Edges are re-created only if
/// both endpoints exist after the node pass.
pub fn import(config: &CairnConfig, file: &Path) -> Result<()> {
    let doc = crate::db::persist::read_document(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    println!(
        "Importing {} nodes and {} edges...",
        doc.nodes.len(),
        doc.edges.len()
    );

    let (graph, mut storage) = super::open_graph(config)?;
    let summary = graph.write().import_document(doc)?;
    super::save_graph(&graph, &mut storage)?;

    println!("Import complete:");
    println!("  Nodes imported: {}", summary.nodes_imported);
    println!("  Nodes skipped:  {} (already exist)", summary.nodes_skipped);
    println!("  Edges created:  {}", summary.edges_imported);
    if summary.edges_skipped > 0 {
        println!("  Edges skipped:  {} (missing endpoint)", summary.edges_skipped);
    }

    Ok(())
}
