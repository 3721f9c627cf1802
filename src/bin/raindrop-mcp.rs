// src/bin/raindrop-mcp.rs
// =============================================================================
// MCP server entry point.
//
// Speaks the Model Context Protocol over stdin/stdout, so an assistant can
// launch it as a child process. All logging goes to stderr.
// =============================================================================

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tracing::info;

use raindrop_guardian::config::Config;
use raindrop_guardian::logging;
use raindrop_guardian::mcp::RaindropServer;
use raindrop_guardian::raindrop::RaindropClient;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);

    let config = Config::from_env()
        .context("Make sure RAINDROP_TOKEN is set in your environment or .env file")?;
    let client = RaindropClient::new(&config).context("Failed to create API client")?;

    info!(api_url = %config.api_url, "starting Raindrop.io MCP server");

    let service = RaindropServer::new(client)
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP server")?;

    // Runs until the client disconnects (EOF on stdin)
    service.waiting().await?;
    Ok(())
}
