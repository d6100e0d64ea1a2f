//! Server metadata endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

pub const SERVER_NAME: &str = "AccuKnox MCP Server";

fn endpoints() -> Value {
    json!({"mcp": "/mcp", "health": "/health", "info": "/info", "tools": "/tools"})
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "mcp",
        "endpoints": endpoints(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ServerInfoResponse {
    pub server: &'static str,
    pub version: &'static str,
    pub tls: bool,
    pub uptime_seconds: u64,
    pub endpoints: Value,
}

/// `GET /info`
pub async fn info(State(state): State<Arc<AppState>>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        server: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        tls: state.tls,
        uptime_seconds: state.start_time.elapsed().as_secs(),
        endpoints: endpoints(),
    })
}

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolInfo>,
}

/// `GET /tools`
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolsResponse> {
    let tools = state
        .mcp
        .tool_catalog()
        .into_iter()
        .map(|(name, description)| ToolInfo { name, description })
        .collect();
    Json(ToolsResponse { tools })
}
