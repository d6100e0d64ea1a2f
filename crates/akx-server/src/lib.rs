//! akx-server - AccuKnox MCP server
//!
//! Serves the AccuKnox CSPM tools over MCP, either on stdio for local
//! clients or over HTTP(S) with a streamable `/mcp` endpoint plus a few
//! plain JSON routes.

pub mod cli;
pub mod mcp;
pub mod routes;
pub mod state;
pub mod transport;

pub use mcp::AccuKnoxMcp;
pub use routes::create_router;
pub use state::AppState;
