//! HTTP and HTTPS listener.
//!
//! Plaintext uses `axum::serve`. With TLS material the listener accepts raw
//! TCP connections, performs the rustls handshake, and hands each stream to
//! hyper with the same router.

use akx_core::{ListenConfig, TlsMaterial, TlsMode};
use anyhow::Context;
use axum::Router;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
    service::TowerToHyperService,
};
use rustls::ServerConfig;
use rustls_pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

use crate::routes::create_router;
use crate::state::AppState;
use crate::transport::shutdown_signal;

/// How long open connections may drain after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Build a rustls server config from PEM files on disk
pub fn load_rustls_config(material: &TlsMaterial) -> anyhow::Result<Arc<ServerConfig>> {
    let certs = CertificateDer::pem_file_iter(material.cert_path())
        .with_context(|| format!("reading certificate {}", material.cert_path().display()))?
        .collect::<Result<Vec<_>, _>>()
        .context("parsing certificate PEM")?;
    if certs.is_empty() {
        anyhow::bail!("no certificates found in {}", material.cert_path().display());
    }

    let key = PrivateKeyDer::from_pem_file(material.key_path())
        .with_context(|| format!("reading private key {}", material.key_path().display()))?;

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("certificate and key do not match")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

/// Bind the configured address and serve until a shutdown signal
pub async fn serve(listen: &ListenConfig, state: Arc<AppState>, tls: &TlsMode) -> anyhow::Result<()> {
    let rustls_config = match tls {
        TlsMode::Tls(material) => Some(load_rustls_config(material)?),
        TlsMode::Plaintext => None,
    };

    let addr = listen.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    let scheme = if rustls_config.is_some() { "https" } else { "http" };
    info!("Listening on {}://{}", scheme, listener.local_addr()?);
    info!("MCP endpoint: {}://{}/mcp", scheme, listener.local_addr()?);

    serve_on(listener, create_router(state), rustls_config, shutdown_signal()).await
}

/// Serve `app` on an already-bound listener until `shutdown` resolves
pub async fn serve_on<F>(
    listener: TcpListener,
    app: Router,
    tls: Option<Arc<ServerConfig>>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match tls {
        None => serve_plain(listener, app, shutdown).await?,
        Some(config) => serve_tls(listener, app, config, shutdown).await,
    }

    info!("HTTP server stopped");
    Ok(())
}

/// Plaintext serving with a bounded drain.
///
/// Graceful shutdown waits for open connections, and an MCP client's SSE
/// stream on `GET /mcp` never closes by itself, so the drain is cut off
/// after `SHUTDOWN_GRACE`.
async fn serve_plain<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result,
        _ = drain_deadline => {
            warn!("Connections still open after {:?}, closing them", SHUTDOWN_GRACE);
            Ok(())
        }
    }
}

async fn serve_tls<F>(listener: TcpListener, app: Router, config: Arc<ServerConfig>, shutdown: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let acceptor = TlsAcceptor::from(config);
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            },
        };

        let acceptor = acceptor.clone();
        let service = TowerToHyperService::new(app.clone());

        tokio::spawn(async move {
            let tls_stream = match acceptor.accept(stream).await {
                Ok(s) => s,
                Err(e) => {
                    debug!("TLS handshake with {} failed: {}", peer, e);
                    return;
                }
            };

            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection_with_upgrades(TokioIo::new(tls_stream), service)
                .await
            {
                debug!("connection {} closed with error: {}", peer, e);
            }
        });
    }
}
