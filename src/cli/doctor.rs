//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::CairnConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &CairnConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let backup_path = config.resolved_backup_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `cairn add` or `cairn serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Cairn Health Report");
    println!("===================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Nodes:           {}", report.node_count);
    println!("  Edges:           {}", report.edge_count);
    if report.dangling_edges > 0 {
        println!("  WARNING: {} edge(s) point at missing nodes", report.dangling_edges);
    }
    println!();
    println!("Backup:            {}", backup_path.display());
    match std::fs::metadata(&backup_path) {
        Ok(meta) => println!("  Size:            {}", format_bytes(meta.len())),
        Err(_) if config.storage.write_backup => println!("  Status:          not written yet"),
        Err(_) => println!("  Status:          disabled"),
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_message);
    }

    if !report.integrity_ok {
        println!();
        println!("Recovery steps:");
        println!("  1. Move the damaged database aside; the next load falls back to the backup.");
        println!("  2. Or export from a good copy and reimport:");
        println!("     cairn export > graph.json");
        println!("     cairn reset && cairn import graph.json");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
