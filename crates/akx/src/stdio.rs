//! MCP client over a spawned `akx-server --transport stdio`.

use rmcp::{
    model::CallToolRequestParam,
    service::RunningService,
    transport::TokioChildProcess,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::session::ToolSession;

const SERVER_BIN: &str = "akx-server";

/// Find the server binary: explicit path, then next to this executable, then PATH
pub fn locate_server(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(ClientError::ServerNotFound)
        };
    }

    if let Some(sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SERVER_BIN)))
        .filter(|p| p.exists())
    {
        return Ok(sibling);
    }

    which::which(SERVER_BIN).map_err(|_| ClientError::ServerNotFound)
}

pub struct StdioSession {
    server: PathBuf,
    service: RunningService<RoleClient, ()>,
}

impl StdioSession {
    /// Spawn the server and complete the MCP handshake
    pub async fn connect(server: PathBuf) -> Result<Self> {
        debug!("spawning {} --transport stdio", server.display());

        let mut cmd = Command::new(&server);
        cmd.arg("--transport").arg("stdio");

        let transport = TokioChildProcess::new(cmd)?;
        let service = ().serve(transport).await.map_err(|e| ClientError::Mcp(e.to_string()))?;

        Ok(Self { server, service })
    }

    /// Tool names the server advertises
    pub async fn tool_names(&self) -> Result<Vec<String>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| ClientError::Mcp(e.to_string()))?;
        Ok(tools.into_iter().map(|t| t.name.to_string()).collect())
    }

    pub async fn close(self) -> Result<()> {
        self.service.cancel().await.map_err(|e| ClientError::Mcp(e.to_string()))?;
        Ok(())
    }
}

impl ToolSession for StdioSession {
    async fn call(&self, name: &str, arguments: Value) -> Result<String> {
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
            .map_err(|e| ClientError::Mcp(e.to_string()))?;

        let text = result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error == Some(true) {
            return Err(ClientError::Tool(text));
        }
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("stdio ({})", self.server.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_path_is_not_found() {
        let err = locate_server(Some(Path::new("/definitely/not/here/akx-server"))).unwrap_err();
        assert!(matches!(err, ClientError::ServerNotFound));
    }

    #[test]
    fn test_explicit_existing_path_wins() {
        let exe = std::env::current_exe().unwrap();
        assert_eq!(locate_server(Some(&exe)).unwrap(), exe);
    }
}
