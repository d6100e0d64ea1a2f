//! Application state.

use akx_core::ApiClient;
use std::sync::Arc;
use std::time::Instant;

use crate::mcp::{AccuKnoxMcp, AssetTools};

/// Shared application state for the HTTP routes
#[derive(Clone)]
pub struct AppState {
    /// MCP handler, cloned per streamable HTTP session
    pub mcp: AccuKnoxMcp,
    /// Whether the listener terminates TLS
    pub tls: bool,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state around an AccuKnox client
    pub fn new(client: ApiClient, tls: bool) -> Arc<Self> {
        let tools = Arc::new(AssetTools::new(client));
        Arc::new(Self {
            mcp: AccuKnoxMcp::new(tools),
            tls,
            start_time: Instant::now(),
        })
    }

    pub fn tools(&self) -> &AssetTools {
        self.mcp.tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akx_core::ApiConfig;

    #[test]
    fn test_state_exposes_tools() {
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9", "t")).unwrap();
        let state = AppState::new(client, true);

        assert!(state.tls);
        assert_eq!(state.mcp.tool_catalog().len(), 3);
        assert!(state.start_time.elapsed().as_secs() < 1);
    }
}
