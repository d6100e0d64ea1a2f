//! akx - interactive test client for the AccuKnox MCP server
//!
//! Talks to `akx-server` either over stdio (spawning it) or over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod error;
mod http;
mod menu;
mod session;
mod stdio;

use cli::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "akx=warn";

fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stdio { server } => {
            let path = stdio::locate_server(server.as_deref())?;
            let session = stdio::StdioSession::connect(path)
                .await
                .context("starting akx-server over stdio")?;

            let tools = session.tool_names().await?;
            println!("{} {}", "Tools:".cyan().bold(), tools.join(", "));

            let outcome = menu::run(&session).await;
            session.close().await?;
            outcome
        }
        Commands::Http { url, insecure } => {
            let session = http::HttpSession::new(&url, insecure)?;
            menu::run(&session).await
        }
        Commands::Health { url, insecure } => {
            let session = http::HttpSession::new(&url, insecure)?;
            let body = session.health().await.with_context(|| format!("checking {}/health", url))?;
            println!("{} {}", "✓".green(), body);
            Ok(())
        }
    }
}
