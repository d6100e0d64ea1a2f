//! AccuKnox request and response types.
//!
//! Responses are decoded leniently: every field has a default so that a
//! record missing a field never fails the whole call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Filters for `GET /api/v1/assets`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    pub asset_id: Option<String>,
    pub type_name: Option<String>,
    pub type_category: Option<String>,
    pub label_name: Option<String>,
    pub region: Option<String>,
    pub cloud_provider: Option<String>,
    pub present_on_date_after: Option<String>,
    pub present_on_date_before: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            asset_id: None,
            type_name: None,
            type_category: None,
            label_name: None,
            region: None,
            cloud_provider: None,
            present_on_date_after: None,
            present_on_date_before: None,
            page: 1,
            page_size: 100,
        }
    }
}

impl AssetQuery {
    /// Query parameters in the order the API documents them.
    ///
    /// Empty filters are dropped, and the date window is sent only when both
    /// ends are present.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];

        let filters = [
            ("id", &self.asset_id),
            ("type_name", &self.type_name),
            ("type_category", &self.type_category),
            ("label_name", &self.label_name),
            ("region", &self.region),
            ("cloud_provider", &self.cloud_provider),
        ];
        for (key, value) in filters {
            if let Some(v) = non_empty(value) {
                params.push((key, v.to_string()));
            }
        }

        if let (Some(after), Some(before)) = (
            non_empty(&self.present_on_date_after),
            non_empty(&self.present_on_date_before),
        ) {
            params.push(("present_on_date_after", after.to_string()));
            params.push(("present_on_date_before", before.to_string()));
        }

        params
    }
}

/// Filters for the AI model inventory (`model-stats`) endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAssetQuery {
    /// Unix seconds, inclusive
    pub last_seen_after: i64,
    /// Unix seconds, inclusive
    pub last_seen_before: i64,
    pub cloud_provider: Option<String>,
    pub deployed: Option<bool>,
}

impl AiAssetQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("last_seen_after", self.last_seen_after.to_string()),
            ("last_seen_before", self.last_seen_before.to_string()),
        ];
        if let Some(provider) = non_empty(&self.cloud_provider) {
            params.push(("cloud_provider", provider.to_string()));
        }
        if let Some(deployed) = self.deployed {
            params.push(("deployed", deployed.to_string()));
        }
        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Assets
// ─────────────────────────────────────────────────────────────────────────────

/// One page of `GET /api/v1/assets`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Asset>,
}

/// Asset record as returned by the inventory API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    /// Usually `{"name": ..., "category": ...}`
    #[serde(default, rename = "type")]
    pub asset_type: Value,
    #[serde(default)]
    pub region: Value,
    /// Usually `{"name": ...}`
    #[serde(default)]
    pub label: Value,
    /// Severity name to count. `Some` whenever the key is present, even as `null`.
    #[serde(default, deserialize_with = "present")]
    pub vulnerabilities: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Asset {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unnamed")
    }

    pub fn display_id(&self) -> String {
        value_text(&self.id).unwrap_or_else(|| "N/A".to_string())
    }

    pub fn type_name(&self) -> &str {
        match &self.asset_type {
            Value::Object(t) => t.get("name").and_then(Value::as_str).unwrap_or("Unknown"),
            _ => "Unknown",
        }
    }

    pub fn type_category(&self) -> Option<&str> {
        match &self.asset_type {
            Value::Object(t) => t
                .get("category")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty()),
            _ => None,
        }
    }

    pub fn display_region(&self) -> String {
        value_text(&self.region).unwrap_or_else(|| "N/A".to_string())
    }

    /// Label name, when the label is an object
    pub fn label_name(&self) -> Option<&str> {
        match &self.label {
            Value::Object(l) => Some(l.get("name").and_then(Value::as_str).unwrap_or("N/A")),
            _ => None,
        }
    }

    /// Non-zero vulnerability counts, in API order
    pub fn vulnerability_counts(&self) -> Vec<(String, u64)> {
        self.vulnerabilities
            .as_ref()
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(severity, count)| {
                count
                    .as_u64()
                    .filter(|c| *c > 0)
                    .map(|c| (severity.clone(), c))
            })
            .collect()
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Model vulnerabilities
// ─────────────────────────────────────────────────────────────────────────────

/// Response of the on-demand model issues summary endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelIssuesSummary {
    #[serde(default)]
    pub ml_model_issues: Vec<SeverityCount>,
    #[serde(default)]
    pub llm_model_issues: Vec<SeverityCount>,
    #[serde(default)]
    pub dataset_issues: Vec<SeverityCount>,
    #[serde(default)]
    pub ml_total: u64,
    #[serde(default)]
    pub llm_total: u64,
    #[serde(default)]
    pub dataset_total: u64,
    #[serde(default)]
    pub total: u64,
}

/// Issue count for one severity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityCount {
    #[serde(default, rename = "vulnerability__risk_factor")]
    pub severity: Option<String>,
    #[serde(default)]
    pub count: u64,
}

impl SeverityCount {
    pub fn severity(&self) -> &str {
        self.severity.as_deref().unwrap_or("Unknown")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AI model inventory
// ─────────────────────────────────────────────────────────────────────────────

/// Response of the model inventory endpoint.
///
/// Shape: `{"data": {"total_count": N, "<provider>": {"data": [model, ...]}}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiAssetInventory {
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// A model found in the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiModel {
    pub name: String,
    pub deployed: bool,
}

impl AiAssetInventory {
    /// Reported total, or 0 when the API leaves it out
    pub fn reported_total(&self) -> u64 {
        self.data.get("total_count").and_then(Value::as_u64).unwrap_or(0)
    }

    /// All models across providers
    pub fn models(&self) -> Vec<AiModel> {
        self.data
            .iter()
            .filter(|(key, _)| key.as_str() != "total_count")
            .filter_map(|(_, provider)| provider.get("data").and_then(Value::as_array))
            .flatten()
            .map(|node| {
                let name = ["model_name", "name"]
                    .iter()
                    .filter_map(|k| node.get(*k).and_then(Value::as_str))
                    .find(|n| !n.is_empty())
                    .unwrap_or("Unnamed")
                    .to_string();
                let deployed = node.get("status").and_then(Value::as_bool).unwrap_or(false);
                AiModel { name, deployed }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_query_defaults() {
        let params = AssetQuery::default().to_params();
        assert_eq!(
            params,
            vec![("page", "1".to_string()), ("page_size", "100".to_string())]
        );
    }

    #[test]
    fn test_asset_query_empty_filters_match_no_filters() {
        let empty = AssetQuery {
            asset_id: Some(String::new()),
            type_name: Some("  ".to_string()),
            region: Some(String::new()),
            cloud_provider: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.to_params(), AssetQuery::default().to_params());
    }

    #[test]
    fn test_asset_query_filters_and_dates() {
        let query = AssetQuery {
            type_category: Some("Container".to_string()),
            cloud_provider: Some("aws".to_string()),
            present_on_date_after: Some("2025-11-22".to_string()),
            present_on_date_before: Some("2025-11-24".to_string()),
            page_size: 5,
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("type_category", "Container".to_string())));
        assert!(params.contains(&("cloud_provider", "aws".to_string())));
        assert!(params.contains(&("present_on_date_after", "2025-11-22".to_string())));
        assert!(params.contains(&("present_on_date_before", "2025-11-24".to_string())));
        assert!(params.contains(&("page_size", "5".to_string())));
    }

    #[test]
    fn test_asset_query_half_date_window_is_dropped() {
        let query = AssetQuery {
            present_on_date_after: Some("2025-11-22".to_string()),
            ..Default::default()
        };
        assert!(query.to_params().iter().all(|(k, _)| !k.starts_with("present_on")));
    }

    #[test]
    fn test_ai_asset_query_params() {
        let query = AiAssetQuery {
            last_seen_after: 100,
            last_seen_before: 200,
            cloud_provider: Some("gcp".to_string()),
            deployed: Some(true),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("last_seen_after", "100".to_string()),
                ("last_seen_before", "200".to_string()),
                ("cloud_provider", "gcp".to_string()),
                ("deployed", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_asset_accessors() {
        let asset: Asset = serde_json::from_value(json!({
            "id": 42,
            "name": "prod-bucket",
            "type": {"name": "s3-bucket", "category": "Block Storage"},
            "region": "us-east-1",
            "label": {"name": "PROD"},
            "vulnerabilities": {"Critical": 2, "High": 0, "Low": 1}
        }))
        .unwrap();

        assert_eq!(asset.display_name(), "prod-bucket");
        assert_eq!(asset.display_id(), "42");
        assert_eq!(asset.type_name(), "s3-bucket");
        assert_eq!(asset.type_category(), Some("Block Storage"));
        assert_eq!(asset.display_region(), "us-east-1");
        assert_eq!(asset.label_name(), Some("PROD"));
        let vulns = asset.vulnerability_counts();
        assert_eq!(vulns.len(), 2);
        assert!(vulns.contains(&("Critical".to_string(), 2)));
    }

    #[test]
    fn test_asset_missing_fields() {
        let asset: Asset = serde_json::from_value(json!({"type": "weird"})).unwrap();
        assert_eq!(asset.display_name(), "Unnamed");
        assert_eq!(asset.display_id(), "N/A");
        assert_eq!(asset.type_name(), "Unknown");
        assert_eq!(asset.type_category(), None);
        assert_eq!(asset.display_region(), "N/A");
        assert_eq!(asset.label_name(), None);
        assert!(asset.vulnerability_counts().is_empty());
    }

    #[test]
    fn test_null_vulnerabilities_still_present() {
        let asset: Asset = serde_json::from_value(json!({"name": "db", "vulnerabilities": null})).unwrap();
        assert!(asset.vulnerabilities.is_some());
        assert!(asset.vulnerability_counts().is_empty());

        let missing: Asset = serde_json::from_value(json!({"name": "db"})).unwrap();
        assert!(missing.vulnerabilities.is_none());
    }

    #[test]
    fn test_model_issues_decode() {
        let summary: ModelIssuesSummary = serde_json::from_value(json!({
            "ml_model_issues": [{"vulnerability__risk_factor": "High", "count": 3}],
            "ml_total": 3,
            "total": 3
        }))
        .unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.ml_model_issues[0].severity(), "High");
        assert!(summary.llm_model_issues.is_empty());
        assert_eq!(summary.dataset_total, 0);
    }

    #[test]
    fn test_ai_inventory_models() {
        let inventory: AiAssetInventory = serde_json::from_value(json!({
            "data": {
                "total_count": 3,
                "aws": {"data": [
                    {"model_name": "fraud-v2", "status": true},
                    {"name": "churn", "status": false}
                ]},
                "azure": {"data": [{"status": true}]},
                "broken": "not-an-object"
            }
        }))
        .unwrap();

        assert_eq!(inventory.reported_total(), 3);
        let models = inventory.models();
        assert_eq!(models.len(), 3);
        assert!(models.contains(&AiModel { name: "fraud-v2".into(), deployed: true }));
        assert!(models.contains(&AiModel { name: "churn".into(), deployed: false }));
        assert!(models.contains(&AiModel { name: "Unnamed".into(), deployed: true }));
    }
}
