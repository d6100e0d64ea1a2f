//! AccuKnox CSPM REST API client.
//!
//! Thin authenticated wrapper: one GET per call, bearer token, per-request
//! timeout, JSON decoding. No retries and no pagination beyond what the API
//! returns for the requested page.
//!
//! # Usage
//!
//! ```rust,no_run
//! use akx_core::{client::ApiClient, config::ApiConfig, types::AssetQuery};
//!
//! #[tokio::main]
//! async fn main() -> akx_core::Result<()> {
//!     let client = ApiClient::new(ApiConfig::new("https://cspm.demo.accuknox.com", "token"))?;
//!     let page = client.fetch_assets(&AssetQuery::default()).await?;
//!     println!("{} assets", page.count);
//!     Ok(())
//! }
//! ```

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{AiAssetInventory, AiAssetQuery, AssetPage, AssetQuery, ModelIssuesSummary};

const ASSETS_PATH: &str = "/api/v1/assets";
const MODEL_ISSUES_PATH: &str = "/api/v1/modelknox/dashboard/ondemand-model-issues-summary/";
const MODEL_STATS_PATH: &str = "/api/v1/modelknox/dashboard/model-stats/";

/// Error bodies longer than this are cut before being surfaced.
const MAX_ERROR_BODY: usize = 512;

/// API client for AccuKnox
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    /// HTTP client (connection pool shared across clones)
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL and token
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("akx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Asset Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Search the asset inventory
    pub async fn fetch_assets(&self, query: &AssetQuery) -> Result<AssetPage> {
        self.get(ASSETS_PATH, &query.to_params()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // ModelKnox Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// AI/ML model vulnerability summary grouped by model type and severity
    pub async fn fetch_model_vulnerabilities(&self) -> Result<ModelIssuesSummary> {
        self.get(MODEL_ISSUES_PATH, &[("page", "1".to_string())]).await
    }

    /// AI model inventory (deployed vs not deployed) for a time window
    pub async fn fetch_ai_assets(&self, query: &AiAssetQuery) -> Result<AiAssetInventory> {
        self.get(MODEL_STATS_PATH, &query.to_params()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        if self.config.base_url.is_empty() {
            return Err(Error::Config("ACCUKNOX_BASE_URL is not configured".into()));
        }

        let url = format!("{}{}", self.config.base_url, path);
        debug!(?params, "API request: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!("GET {} failed: {}", url, e);
                Error::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!("GET {} returned {}", url, status);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("GET {} returned malformed JSON: {}", url, e);
            Error::Decode(e.to_string())
        })
    }
}
