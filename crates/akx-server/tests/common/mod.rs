//! Shared fixtures for akx-server integration tests.
//!
//! Each test gets its own fake AccuKnox API and its own server, both on
//! random local ports. Dropping a `TestServer` shuts it down.

#![allow(dead_code)]

use akx_core::{ApiClient, ApiConfig, TlsMode, TlsSource};
use akx_server::{create_router, transport::http, AppState};
use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const TEST_TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

/// Fake AccuKnox API serving fixed asset and model data
pub fn fake_api() -> Router {
    Router::new()
        .route(
            "/api/v1/assets",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({
                    "count": 42,
                    "results": [
                        {"id": "a-1", "name": "web-01", "type": {"name": "ec2-instance", "category": "Compute"}, "region": "us-east-1"},
                        {"id": "a-2", "name": "bucket-logs", "type": {"name": "s3-bucket", "category": "Storage"}, "region": "us-east-1"}
                    ]
                }))
                .into_response()
            }),
        )
        .route(
            "/api/v1/modelknox/dashboard/ondemand-model-issues-summary/",
            get(|| async {
                Json(json!({
                    "ml_model_issues": [{"vulnerability__risk_factor": "High", "count": 3}],
                    "llm_model_issues": [],
                    "dataset_issues": [],
                    "ml_total": 3,
                    "llm_total": 0,
                    "dataset_total": 0,
                    "total": 3
                }))
            }),
        )
}

/// Fake AccuKnox API that fails every request with a 500
pub fn failing_api() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") })
}

/// Serve a router on a random port, returning its base URL
pub async fn spawn_api(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake api");
    let addr = listener.local_addr().expect("fake api addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// API client pointed at `base_url` with the test token
pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(ApiConfig::new(base_url, TEST_TOKEN)).expect("api client")
}

/// Self-signed certificate and key for `localhost`, as PEM
pub fn self_signed_pem() -> (String, String) {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".into()]).expect("generate cert");
    (
        cert.serialize_pem().expect("serialize cert"),
        cert.serialize_private_key_pem(),
    )
}

/// akx-server instance on a random port
pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    pub port: u16,
    _tls: TlsMode,
    _shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Plaintext server backed by the given fake API
    pub async fn spawn(api: Router) -> Self {
        Self::spawn_with(api, TlsSource::default()).await
    }

    /// Server with TLS from inline self-signed PEM data
    pub async fn spawn_tls(api: Router) -> Self {
        let (cert, key) = self_signed_pem();
        let source = TlsSource {
            cert_data: Some(cert),
            key_data: Some(key),
            ..Default::default()
        };
        Self::spawn_with(api, source).await
    }

    async fn spawn_with(api: Router, source: TlsSource) -> Self {
        let api_url = spawn_api(api).await;
        let tls = source.resolve().expect("resolve tls");
        let rustls_config = match &tls {
            TlsMode::Tls(material) => Some(http::load_rustls_config(material).expect("rustls config")),
            TlsMode::Plaintext => None,
        };
        let scheme = if rustls_config.is_some() { "https" } else { "http" };

        let state = AppState::new(client_for(&api_url), tls.is_tls());
        let app = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind server");
        let port = listener.local_addr().expect("server addr").port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            let _ = http::serve_on(listener, app, rustls_config, shutdown).await;
        });

        Self {
            base_url: format!("{}://127.0.0.1:{}", scheme, port),
            port,
            _tls: tls,
            _shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Signal shutdown and report whether the server stopped within `within`
    pub async fn shutdown(&mut self, within: Duration) -> bool {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => tokio::time::timeout(within, task).await.is_ok(),
            None => true,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// reqwest client that trusts the self-signed test certificate
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .expect("reqwest client")
}
