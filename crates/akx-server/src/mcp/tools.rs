//! Tool implementations shared by the MCP handler and the legacy
//! `/call_tool` endpoint.
//!
//! Each call is one independent request to AccuKnox. Errors are returned to
//! the caller as-is; nothing is retried or cached.

use akx_core::types::{AiAssetQuery, AssetQuery};
use akx_core::{render, ApiClient, Error, Result};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of assets listed
pub const DEFAULT_LIMIT: u32 = 10;
/// Days covered by the default `present_on` window
pub const DEFAULT_WINDOW_DAYS: i64 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How `search_assets` answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Formatted asset list
    #[default]
    List,
    /// Total count only
    Count,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Parameters for search_assets tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchAssetsParams {
    /// Filter by specific asset ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Filter by asset type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Filter by category (Configuration, User, Models, Block Storage, CI/CD,
    /// Datasets, Container, Audit logging, IaC_github-repository)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_category: Option<String>,
    /// Filter by label name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_name: Option<String>,
    /// Filter by cloud region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Filter by provider (aws, azure, gcp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    /// "list" (default) or "count"
    #[serde(default)]
    pub return_type: ReturnType,
    /// Maximum results to return (default: 10)
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Include label and vulnerability data
    #[serde(default)]
    pub detailed: bool,
    /// true for deployed models, false for undeployed models, omit to ignore
    /// deployment status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed: Option<bool>,
    /// Assets present on or after this date (YYYY-MM-DD). Defaults to two
    /// days ago.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_on_date_after: Option<String>,
    /// Assets present on or before this date (YYYY-MM-DD). Defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_on_date_before: Option<String>,
}

impl Default for SearchAssetsParams {
    fn default() -> Self {
        Self {
            asset_id: None,
            type_name: None,
            type_category: None,
            label_name: None,
            region: None,
            cloud_provider: None,
            return_type: ReturnType::List,
            limit: DEFAULT_LIMIT,
            detailed: false,
            deployed: None,
            present_on_date_after: None,
            present_on_date_before: None,
        }
    }
}

/// AccuKnox-backed tool implementations
#[derive(Clone)]
pub struct AssetTools {
    client: ApiClient,
}

impl AssetTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search, count or list assets; AI model inventory when `deployed` is set
    pub async fn search_assets(&self, params: &SearchAssetsParams) -> Result<String> {
        self.search_assets_on(params, Utc::now().date_naive()).await
    }

    async fn search_assets_on(&self, params: &SearchAssetsParams, today: NaiveDate) -> Result<String> {
        let (after, before) = date_window(
            params.present_on_date_after.as_deref(),
            params.present_on_date_before.as_deref(),
            today,
        )?;

        if params.deployed.is_some() {
            let query = AiAssetQuery {
                last_seen_after: start_of_day(after),
                last_seen_before: end_of_day(before),
                cloud_provider: params.cloud_provider.clone(),
                deployed: params.deployed,
            };
            debug!(?query, "search_assets: model inventory");
            let inventory = self.client.fetch_ai_assets(&query).await?;
            return Ok(render::ai_assets(&inventory));
        }

        let mut query = AssetQuery {
            asset_id: params.asset_id.clone(),
            type_name: params.type_name.clone(),
            type_category: params.type_category.clone(),
            label_name: params.label_name.clone(),
            region: params.region.clone(),
            cloud_provider: params.cloud_provider.clone(),
            present_on_date_after: Some(after.format(DATE_FORMAT).to_string()),
            present_on_date_before: Some(before.format(DATE_FORMAT).to_string()),
            ..Default::default()
        };

        match params.return_type {
            ReturnType::Count => {
                query.page_size = 1;
                let page = self.client.fetch_assets(&query).await?;
                Ok(render::asset_count(page.count))
            }
            ReturnType::List => {
                query.page_size = params.limit.max(1);
                let page = self.client.fetch_assets(&query).await?;
                debug!("search_assets: {} of {} assets", page.results.len(), page.count);
                Ok(render::asset_list(&page.results, page.count, params.detailed))
            }
        }
    }

    /// AI/ML model vulnerability summary
    pub async fn model_vulnerabilities(&self) -> Result<String> {
        let summary = self.client.fetch_model_vulnerabilities().await?;
        Ok(render::model_vulnerabilities(&summary))
    }
}

/// Liveness payload, independent of AccuKnox
pub fn health_payload() -> serde_json::Value {
    serde_json::json!({ "status": "healthy" })
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, DATE_FORMAT)
            .map(Some)
            .map_err(|_| Error::InvalidDate {
                field,
                value: v.to_string(),
            }),
    }
}

/// Resolve the `present_on` window, filling in defaults relative to `today`
fn date_window(after: Option<&str>, before: Option<&str>, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let after = parse_date("present_on_date_after", after)?
        .unwrap_or(today - Duration::days(DEFAULT_WINDOW_DAYS));
    let before = parse_date("present_on_date_before", before)?.unwrap_or(today);
    Ok((after, before))
}

fn start_of_day(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn end_of_day(date: NaiveDate) -> i64 {
    start_of_day(date) + 86_399
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_params_defaults_from_empty_object() {
        let params: SearchAssetsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.return_type, ReturnType::List);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert!(!params.detailed);
        assert!(params.deployed.is_none());
    }

    #[test]
    fn test_params_return_type_count() {
        let params: SearchAssetsParams =
            serde_json::from_value(serde_json::json!({"return_type": "count", "type_category": "Models"})).unwrap();
        assert_eq!(params.return_type, ReturnType::Count);
        assert_eq!(params.type_category.as_deref(), Some("Models"));
    }

    #[test]
    fn test_params_reject_unknown_return_type() {
        let result: std::result::Result<SearchAssetsParams, _> =
            serde_json::from_value(serde_json::json!({"return_type": "table"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_window_is_two_days() {
        let (after, before) = date_window(None, None, day("2025-11-24")).unwrap();
        assert_eq!(after, day("2025-11-22"));
        assert_eq!(before, day("2025-11-24"));
    }

    #[test]
    fn test_explicit_window_kept() {
        let (after, before) = date_window(Some("2025-01-01"), Some(""), day("2025-11-24")).unwrap();
        assert_eq!(after, day("2025-01-01"));
        assert_eq!(before, day("2025-11-24"));
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = date_window(Some("22/11/2025"), None, day("2025-11-24")).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { field: "present_on_date_after", .. }));
    }

    #[test]
    fn test_day_bounds_are_utc() {
        let d = day("2023-11-14");
        assert_eq!(start_of_day(d), 1_699_920_000);
        assert_eq!(end_of_day(d), 1_700_006_399);
    }

    #[test]
    fn test_health_payload() {
        assert_eq!(health_payload().to_string(), r#"{"status":"healthy"}"#);
    }

    mod with_api {
        use super::*;
        use akx_core::ApiConfig;
        use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
        use serde_json::json;
        use std::collections::HashMap;

        async fn tools_for(router: Router) -> AssetTools {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            let client = ApiClient::new(ApiConfig::new(format!("http://{}", addr), "t")).unwrap();
            AssetTools::new(client)
        }

        /// Echoes the query back as the single asset's name
        fn echo_assets() -> Router {
            Router::new().route(
                "/api/v1/assets",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let mut keys: Vec<_> = q.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    keys.sort();
                    Json(json!({"count": 99, "results": [{"name": keys.join("&")}]}))
                }),
            )
        }

        #[tokio::test]
        async fn test_count_requests_single_row() {
            let tools = tools_for(echo_assets()).await;
            let params = SearchAssetsParams {
                return_type: ReturnType::Count,
                ..Default::default()
            };

            let text = tools.search_assets_on(&params, day("2025-11-24")).await.unwrap();
            assert_eq!(text, "Total assets: 99");
        }

        #[tokio::test]
        async fn test_list_sends_limit_and_window() {
            let tools = tools_for(echo_assets()).await;
            let params = SearchAssetsParams {
                limit: 5,
                cloud_provider: Some("aws".into()),
                ..Default::default()
            };

            let text = tools.search_assets_on(&params, day("2025-11-24")).await.unwrap();
            assert!(text.contains("Found 1 assets (Total: 99)"));
            assert!(text.contains("cloud_provider=aws"));
            assert!(text.contains("page_size=5"));
            assert!(text.contains("present_on_date_after=2025-11-22"));
            assert!(text.contains("present_on_date_before=2025-11-24"));
        }

        #[tokio::test]
        async fn test_empty_filters_same_as_none() {
            let tools = tools_for(echo_assets()).await;
            let empty = SearchAssetsParams {
                asset_id: Some(String::new()),
                type_name: Some(String::new()),
                type_category: Some(String::new()),
                label_name: Some(String::new()),
                region: Some(String::new()),
                cloud_provider: Some(String::new()),
                return_type: ReturnType::Count,
                ..Default::default()
            };
            let none = SearchAssetsParams {
                return_type: ReturnType::Count,
                ..Default::default()
            };

            let today = day("2025-11-24");
            assert_eq!(
                tools.search_assets_on(&empty, today).await.unwrap(),
                tools.search_assets_on(&none, today).await.unwrap()
            );
        }

        #[tokio::test]
        async fn test_deployed_uses_model_inventory() {
            let router = Router::new().route(
                "/api/v1/modelknox/dashboard/model-stats/",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    Json(json!({"data": {"aws": {"data": [
                        {"model_name": format!("{}-{}", q["last_seen_after"], q["last_seen_before"]), "status": true}
                    ]}}}))
                }),
            );
            let tools = tools_for(router).await;
            let params = SearchAssetsParams {
                deployed: Some(true),
                present_on_date_after: Some("2023-11-14".into()),
                present_on_date_before: Some("2023-11-14".into()),
                ..Default::default()
            };

            let text = tools.search_assets_on(&params, day("2025-11-24")).await.unwrap();
            assert!(text.contains("Deployed Models (1):"));
            assert!(text.contains("- 1699920000-1700006399"));
        }

        #[tokio::test]
        async fn test_api_failure_propagates() {
            let router = Router::new().route(
                "/api/v1/modelknox/dashboard/ondemand-model-issues-summary/",
                get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
            );
            let tools = tools_for(router).await;

            let err = tools.model_vulnerabilities().await.unwrap_err();
            assert_eq!(err.status(), Some(503));
        }
    }
}
