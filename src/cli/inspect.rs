//! CLI `inspect` command: display full details for a single node.

use anyhow::Result;

use crate::config::CairnConfig;

/// Inspect a single node by ID and display its details and edges.
///
/// Counts as an access, so the updated statistics are saved.
pub fn inspect(config: &CairnConfig, id: &str) -> Result<()> {
    let (graph, mut storage) = super::open_graph(config)?;

    let node = graph.get_node(id)?;
    let (outgoing, incoming) = {
        let g = graph.read();
        (g.outgoing_edges(id), g.incoming_edges(id))
    };
    super::save_graph(&graph, &mut storage)?;

    println!("Node: {}", node.id);
    println!("{}", "=".repeat(50));
    println!("  Type:           {}", node.node_type);
    println!("  Importance:     {:.2}", node.importance);
    println!("  Access count:   {}", node.access_count);
    if let Some(ref la) = node.last_accessed {
        println!("  Last accessed:  {la}");
    }
    println!("  Created:        {}", node.created_at);
    println!("  Updated:        {}", node.updated_at);
    if !node.metadata.is_empty() {
        println!("  Metadata:       {}", serde_json::to_string_pretty(&node.metadata)?);
    }
    println!();
    println!("Content:");
    println!("  {}", node.content);

    if !outgoing.is_empty() {
        println!();
        println!("Outgoing:");
        for edge in &outgoing {
            println!("  --[{}]--> {}", edge.relationship, edge.target_id);
        }
    }
    if !incoming.is_empty() {
        println!();
        println!("Incoming:");
        for edge in &incoming {
            println!("  <--[{}]-- {}", edge.relationship, edge.source_id);
        }
    }

    Ok(())
}
