//! HTTP route modules.

pub mod call_tool;
pub mod health;
pub mod info;

use axum::{
    routing::{get, post},
    Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let mcp = state.mcp.clone();
    let mcp_service = StreamableHttpService::new(
        move || Ok(mcp.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/", get(info::root))
        .route("/health", get(health::health_check))
        .route("/healthz", get(health::healthz))
        .route("/info", get(info::info))
        .route("/tools", get(info::list_tools))
        .route("/call_tool", post(call_tool::call_tool))
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
