//! MCP Server implementation.
//!
//! Tools are declared with `#[tool_router]`; the same handler is served over
//! stdio and over streamable HTTP.

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    tool, tool_router, ErrorData, RoleServer, ServerHandler,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::tools::{health_payload, AssetTools, SearchAssetsParams};

/// AccuKnox MCP Server
///
/// Exposes AccuKnox CSPM queries as MCP tools.
#[derive(Clone)]
pub struct AccuKnoxMcp {
    tools: Arc<AssetTools>,
    tool_router: ToolRouter<Self>,
}

impl AccuKnoxMcp {
    pub fn new(tools: Arc<AssetTools>) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Name and description of every registered tool
    pub fn tool_catalog(&self) -> Vec<(String, String)> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                let description = t.description.map(|d| d.to_string()).unwrap_or_default();
                (t.name.to_string(), description)
            })
            .collect()
    }

    /// Shared implementations behind the tools
    pub fn tools(&self) -> &Arc<AssetTools> {
        &self.tools
    }
}

fn tool_result(tool: &str, result: akx_core::Result<String>) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => {
            warn!("{} failed: {}", tool, e);
            Ok(CallToolResult::error(vec![Content::text(format!("Error: {}", e))]))
        }
    }
}

#[tool_router]
impl AccuKnoxMcp {
    /// Search and filter cloud infrastructure assets
    #[tool(description = "READ-ONLY: Search and filter cloud infrastructure assets. \
        Use return_type=\"count\" for totals (e.g. \"How many Models do I have?\" -> type_category=\"Models\", return_type=\"count\"), \
        detailed=true for labels and vulnerabilities, deployed=true/false for the AI model inventory. \
        Dates use YYYY-MM-DD and default to the last two days.")]
    async fn search_assets(
        &self,
        Parameters(params): Parameters<SearchAssetsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(?params, "search_assets");
        tool_result("search_assets", self.tools.search_assets(&params).await)
    }

    /// Model vulnerability summary by severity
    #[tool(description = "READ-ONLY: Get the AI/ML model security vulnerabilities summary. \
        Shows totals for ML models, LLM models and datasets with a Critical/High/Medium/Low breakdown.")]
    async fn get_model_vulnerabilities(&self) -> Result<CallToolResult, ErrorData> {
        tool_result(
            "get_model_vulnerabilities",
            self.tools.model_vulnerabilities().await,
        )
    }

    /// Liveness check
    #[tool(description = "Check that the AccuKnox MCP server is alive. Does not contact AccuKnox.")]
    async fn health_check(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            health_payload().to_string(),
        )]))
    }
}

impl ServerHandler for AccuKnoxMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "AccuKnox MCP Server - read-only access to AccuKnox CSPM assets and AI/ML model vulnerabilities."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move {
            let tools = self.tool_router.list_all();
            debug!("list_tools: returning {} tools", tools.len());
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        debug!("Calling tool: {}", request.name);
        async move {
            let tool_context = ToolCallContext::new(self, request, context);
            self.tool_router.call(tool_context).await
        }
    }
}
