//! akx-core - Core library for the AccuKnox MCP bridge
//!
//! Shared between the `akx-server` MCP server and the `akx` test client:
//!
//! - **config**: immutable configuration read once from the environment
//! - **client**: authenticated AccuKnox CSPM REST client
//! - **types**: query and response types
//! - **render**: plain-text rendering of responses for tool results
//! - **tls**: certificate/key resolution with scoped temp files

pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod tls;
pub mod types;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::{ApiConfig, Config, ListenConfig};
pub use error::{Error, Result};
pub use tls::{TlsMaterial, TlsMode, TlsSource};
