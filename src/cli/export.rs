use anyhow::Result;
use std::path::Path;

use crate::config::CairnConfig;

/// Export the whole graph as a JSON document, to `file` or stdout.
pub fn export(config: &CairnConfig, file: Option<&Path>) -> Result<()> {
    let (graph, _storage) = super::open_graph(config)?;
    let doc = graph.snapshot();

    match file {
        Some(path) => crate::db::persist::write_document(path, &doc)?,
        None => println!("{}", serde_json::to_string_pretty(&doc)?),
    }

    eprintln!(
        "Exported {} nodes and {} edges.",
        doc.nodes.len(),
        doc.edges.len()
    );
    Ok(())
}
