//! MCP server initialization for stdio and Streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that load the
//! persisted graph and wire it, its storage and the config into the MCP tool
//! handler.

use crate::config::CairnConfig;
use crate::db::persist::Storage;
use crate::graph::GraphHandle;
use crate::tools::CairnTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open storage and load the graph.
/// Returns (graph, storage, config) ready for sharing across sessions.
fn setup_shared_state(
    config: CairnConfig,
) -> Result<(GraphHandle, Arc<Mutex<Storage>>, Arc<CairnConfig>)> {
    let storage = Storage::open(&config)?;
    tracing::info!(db = %config.resolved_db_path().display(), "database ready");

    let graph = GraphHandle::default();
    graph.load(&storage).context("failed to load memory graph")?;
    {
        let g = graph.read();
        tracing::info!(nodes = g.node_count(), edges = g.edge_count(), "memory graph ready");
    }

    Ok((graph, Arc::new(Mutex::new(storage)), Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: CairnConfig) -> Result<()> {
    tracing::info!("starting Cairn MCP server on stdio");

    let (graph, storage, config) = setup_shared_state(config)?;

    let tools = CairnTools::new(graph, storage, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over Streamable HTTP transport.
///
/// Every session shares the same graph and storage.
pub async fn serve_http(config: CairnConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting Cairn MCP server on HTTP");

    let (graph, storage, config) = setup_shared_state(config)?;

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(CairnTools::new(graph.clone(), storage.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
