mod cli;
mod config;
mod db;
mod error;
mod graph;
mod interaction;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use graph::types::{NodeType, RelationshipType};

#[derive(Parser)]
#[command(name = "cairn", version, about = "Persistent memory graph for AI assistants")]
struct Cli {
    /// Config file (defaults to ~/.cairn/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server
    Serve {
        /// Transport to use: stdio or http (defaults to the configured one)
        #[arg(long)]
        transport: Option<String>,
    },
    /// Store a new memory and print its id
    Add {
        content: String,
        #[arg(long = "type", default_value = "context")]
        node_type: NodeType,
        #[arg(long)]
        importance: Option<f64>,
        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Keyword search over node content
    Search {
        query: Option<String>,
        #[arg(long = "type")]
        node_type: Option<NodeType>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the context assembled for a query
    Context {
        query: String,
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// Show full details for one node (counts as an access)
    Inspect { id: String },
    /// List nodes within a few hops of a node
    Related {
        id: String,
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
    /// Add a directed edge between two nodes
    Link {
        source: String,
        target: String,
        #[arg(long, default_value = "related_to")]
        relationship: RelationshipType,
        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Fold SOURCE into TARGET and delete SOURCE
    Merge { source: String, target: String },
    /// Delete a node and its edges
    Forget { id: String },
    /// Show graph statistics
    Stats,
    /// Export the graph as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import nodes and edges from a JSON export
    Import { file: PathBuf },
    /// Run database diagnostics
    Doctor,
    /// Delete every node and edge
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = match &cli.config {
        Some(path) => config::CairnConfig::load_from(path)?,
        None => config::CairnConfig::load()?,
    };

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            let transport = transport.unwrap_or_else(|| config.server.transport.clone());
            match transport.as_str() {
                "stdio" => server::serve_stdio(config).await?,
                "http" => server::serve_http(config).await?,
                other => anyhow::bail!("unknown transport {other:?} (expected stdio or http)"),
            }
        }
        Command::Add {
            content,
            node_type,
            importance,
            metadata,
        } => cli::add::add(&config, &content, node_type, importance, metadata.as_deref())?,
        Command::Search {
            query,
            node_type,
            limit,
        } => cli::search::search(&config, query.as_deref(), node_type, limit)?,
        Command::Context { query, max_nodes } => cli::search::context(&config, &query, max_nodes)?,
        Command::Inspect { id } => cli::inspect::inspect(&config, &id)?,
        Command::Related { id, depth } => cli::search::related(&config, &id, depth)?,
        Command::Link {
            source,
            target,
            relationship,
            metadata,
        } => cli::link::link(&config, &source, &target, relationship, metadata.as_deref())?,
        Command::Merge { source, target } => cli::merge::merge(&config, &source, &target)?,
        Command::Forget { id } => cli::forget::forget(&config, &id)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Export { output } => cli::export::export(&config, output.as_deref())?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
