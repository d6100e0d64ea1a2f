//! akx-server - AccuKnox MCP server binary.

use akx_core::{ApiClient, Config};
use akx_server::{
    cli::{Cli, Transport},
    mcp::{AccuKnoxMcp, AssetTools},
    state::AppState,
    transport,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset, empty or unparsable
const DEFAULT_LOG_FILTER: &str = "akx_server=info,akx_core=info";

fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    // stdout carries the stdio protocol, so logs go to stderr
    let filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    info!("akx-server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    config.listen = config.listen.with_overrides(cli.host.clone(), cli.port, cli.workers)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.listen.workers)
        .enable_all()
        .build()?;

    runtime.block_on(run(cli.transport, config))
}

async fn run(transport: Transport, config: Config) -> anyhow::Result<()> {
    if !config.api.is_complete() {
        warn!("ACCUKNOX_BASE_URL or ACCUKNOX_API_TOKEN is not set; tool calls will fail");
    }

    let client = ApiClient::new(config.api.clone())?;

    match transport {
        Transport::Stdio => {
            let server = AccuKnoxMcp::new(Arc::new(AssetTools::new(client)));
            transport::stdio::serve(server).await
        }
        Transport::Http => {
            // Temp files backing inline TLS data live as long as `tls`
            let tls = config.tls.resolve()?;
            info!(
                "Starting HTTP transport on {} ({} worker threads, TLS {})",
                config.listen.bind_addr(),
                config.listen.workers,
                if tls.is_tls() { "enabled" } else { "disabled" }
            );

            let state = AppState::new(client, tls.is_tls());
            let result = transport::http::serve(&config.listen, state, &tls).await;
            drop(tls);
            result
        }
    }
}
