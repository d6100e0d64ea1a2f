//! Health check endpoints.

use axum::Json;
use serde_json::Value;

use crate::mcp::tools::health_payload;

/// `GET /health` - always `{"status": "healthy"}`
pub async fn health_check() -> Json<Value> {
    Json(health_payload())
}

/// `GET /healthz` - plain-text probe
pub async fn healthz() -> &'static str {
    "OK"
}
