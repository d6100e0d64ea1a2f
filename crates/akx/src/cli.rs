//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_URL: &str = "http://localhost:8000";

/// AccuKnox MCP test client
///
/// Drives the server's tools from an interactive menu.
#[derive(Parser, Debug)]
#[command(name = "akx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Spawn akx-server over stdio and talk MCP to it
    Stdio {
        /// Path to the akx-server binary
        #[arg(long, env = "AKX_SERVER_BIN")]
        server: Option<PathBuf>,
    },

    /// Call tools through the server's POST /call_tool endpoint
    Http {
        /// Server base URL
        #[arg(long, env = "AKX_URL", default_value = DEFAULT_URL)]
        url: String,

        /// Accept self-signed certificates
        #[arg(short = 'k', long)]
        insecure: bool,
    },

    /// Check GET /health
    Health {
        /// Server base URL
        #[arg(long, env = "AKX_URL", default_value = DEFAULT_URL)]
        url: String,

        /// Accept self-signed certificates
        #[arg(short = 'k', long)]
        insecure: bool,
    },
}
