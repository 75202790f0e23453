//! stdio transport

use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;

use crate::server::McpApp;

/// Serve the app over stdin/stdout until the client disconnects or
/// `shutdown` is cancelled
pub async fn serve_stdio(app: McpApp, shutdown: CancellationToken) -> anyhow::Result<()> {
    tracing::info!(
        server = %app.metadata().name,
        tools = app.registry().len(),
        "Starting MCP server on stdio"
    );

    let service = app
        .serve_with_ct(rmcp::transport::stdio(), shutdown.child_token())
        .await?;

    tracing::info!("Server running, waiting for requests...");

    let reason = service.waiting().await?;

    tracing::info!(?reason, "stdio transport closed");
    Ok(())
}
