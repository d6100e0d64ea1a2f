//! Command-line arguments.
//!
//! Flags override the matching environment variables.

use clap::{Parser, ValueEnum};

/// AccuKnox MCP Server
///
/// Read-only CSPM asset and AI/ML vulnerability tools over MCP.
#[derive(Parser, Debug)]
#[command(name = "akx-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Transport to serve MCP on
    #[arg(short, long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Bind host for the HTTP transport (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port for the HTTP transport (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Runtime worker threads (overrides WORKERS)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    /// MCP over stdin/stdout
    Stdio,
    /// Streamable HTTP at /mcp, with TLS when configured
    Http,
}
