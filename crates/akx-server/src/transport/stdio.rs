//! MCP over stdin/stdout.

use rmcp::ServiceExt;
use tracing::info;

use crate::mcp::AccuKnoxMcp;
use crate::transport::shutdown_signal;

/// Serve one MCP session on the process's stdio until the client
/// disconnects or a shutdown signal arrives
pub async fn serve(server: AccuKnoxMcp) -> anyhow::Result<()> {
    info!("Serving MCP over stdio");

    let service = server.serve(rmcp::transport::stdio()).await?;
    let cancel = service.cancellation_token();

    tokio::select! {
        reason = service.waiting() => {
            info!("stdio session closed: {:?}", reason?);
        }
        _ = shutdown_signal() => {
            cancel.cancel();
        }
    }

    Ok(())
}
