//! MCP (Model Context Protocol) server implementation.
//!
//! The same handler backs the stdio transport and the `/mcp` streamable HTTP
//! endpoint.

pub mod server;
pub mod tools;

pub use server::AccuKnoxMcp;
pub use tools::{AssetTools, SearchAssetsParams};
