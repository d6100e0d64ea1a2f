//! Error types for akx.

use thiserror::Error;

/// Main error type for akx operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("akx-server binary not found. Pass --server or put akx-server on PATH.")]
    ServerNotFound,

    #[error("Failed to start server: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Tool failed: {0}")]
    Tool(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
