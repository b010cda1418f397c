use anyhow::Result;

use crate::config::CairnConfig;

/// Display graph statistics in the terminal.
pub fn stats(config: &CairnConfig) -> Result<()> {
    let (graph, _storage) = super::open_graph(config)?;
    let response = graph.stats();

    println!("Memory Graph Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total nodes:         {}", response.total_nodes);
    println!("  Total edges:         {}", response.total_edges);
    println!("  Total accesses:      {}", response.total_accesses);
    println!();

    println!("By Type:");
    for (t, count) in &response.by_type {
        println!("  {:<16} {}", t, count);
    }
    println!();

    println!("By Relationship:");
    for (r, count) in &response.by_relationship {
        println!("  {:<16} {}", r, count);
    }
    println!();

    if let Some(ref oldest) = response.oldest_node {
        println!("Oldest node:           {oldest}");
    }
    if let Some(ref newest) = response.newest_node {
        println!("Newest node:           {newest}");
    }

    Ok(())
}
