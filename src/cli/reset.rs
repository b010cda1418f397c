//! CLI `reset` command: delete the whole graph after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::CairnConfig;
use crate::graph::GraphHandle;

/// Delete all nodes and edges after user confirmation.
///
/// Saving an empty graph also overwrites the backup, so it cannot bring
/// the old contents back on the next load.
pub fn reset(config: &CairnConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL nodes and edges.");
    println!("Database: {}", db_path.display());
    if config.storage.write_backup {
        println!("Backup:   {}", config.resolved_backup_path().display());
    }
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut storage = crate::db::persist::Storage::open(config)?;
    GraphHandle::default().save(&mut storage)?;

    println!("All memories deleted. Reset complete.");
    Ok(())
}
