//! Legacy JSON tool endpoint.
//!
//! `POST /call_tool` with `{"tool": "...", "arguments": {...}}` answers
//! `{"result": "..."}`. Kept for simple HTTP clients that do not speak MCP.

use akx_core::Error;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::mcp::tools::health_payload;
use crate::mcp::SearchAssetsParams;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallToolRequest {
    pub tool: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallToolResponse {
    pub result: String,
}

/// Error answer for `/call_tool`
#[derive(Debug)]
pub enum CallToolError {
    UnknownTool(String),
    InvalidArguments(String),
    Failed(Error),
}

impl IntoResponse for CallToolError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            CallToolError::UnknownTool(name) => {
                (StatusCode::BAD_REQUEST, format!("Unknown tool: {}", name))
            }
            CallToolError::InvalidArguments(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid arguments: {}", msg))
            }
            CallToolError::Failed(e @ Error::InvalidDate { .. }) => (StatusCode::BAD_REQUEST, e.to_string()),
            CallToolError::Failed(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `POST /call_tool`
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallToolRequest>,
) -> Result<Json<CallToolResponse>, CallToolError> {
    debug!("call_tool: {}", request.tool);

    let result = match request.tool.as_str() {
        "search_assets" => {
            let arguments = request.arguments.unwrap_or_else(|| json!({}));
            let params: SearchAssetsParams = serde_json::from_value(arguments)
                .map_err(|e| CallToolError::InvalidArguments(e.to_string()))?;
            state.tools().search_assets(&params).await
        }
        "get_model_vulnerabilities" => state.tools().model_vulnerabilities().await,
        "health_check" => Ok(health_payload().to_string()),
        other => return Err(CallToolError::UnknownTool(other.to_string())),
    };

    match result {
        Ok(result) => Ok(Json(CallToolResponse { result })),
        Err(e) => {
            warn!("call_tool {} failed: {}", request.tool, e);
            Err(CallToolError::Failed(e))
        }
    }
}
