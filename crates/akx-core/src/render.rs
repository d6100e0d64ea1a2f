//! Plain-text rendering of AccuKnox responses for tool results.

use std::fmt::Write;

use crate::types::{AiAssetInventory, Asset, ModelIssuesSummary, SeverityCount};

/// Undeployed model names listed before the output is cut short
pub const UNDEPLOYED_DISPLAY_LIMIT: usize = 20;

fn rule() -> String {
    "=".repeat(70)
}

/// Render an asset list with the API's total count
pub fn asset_list(assets: &[Asset], total_count: u64, detailed: bool) -> String {
    if assets.is_empty() {
        return "No assets found.".to_string();
    }

    let mut out = format!("Found {} assets (Total: {}):\n\n", assets.len(), total_count);

    for (idx, asset) in assets.iter().enumerate() {
        let _ = writeln!(out, "{}\nAsset #{}\n{}", rule(), idx + 1, rule());
        let _ = writeln!(out, "Name: {}", asset.display_name());
        let _ = writeln!(out, "ID: {}", asset.display_id());
        let _ = write!(out, "Type: {}", asset.type_name());
        if let Some(category) = asset.type_category() {
            let _ = write!(out, " (Category: {})", category);
        }
        let _ = writeln!(out, "\nRegion: {}", asset.display_region());

        if detailed || asset.vulnerabilities.is_some() {
            if let Some(label) = asset.label_name() {
                let _ = writeln!(out, "Label: {}", label);
            }
            let vulns = asset.vulnerability_counts();
            if !vulns.is_empty() {
                let joined: Vec<String> = vulns.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                let _ = writeln!(out, "Vulnerabilities: {}", joined.join(", "));
            }
        }

        out.push('\n');
    }

    out
}

/// Render a count-only answer
pub fn asset_count(total: u64) -> String {
    format!("Total assets: {}", total)
}

fn severity_icon(severity: &str) -> &'static str {
    match severity {
        "Critical" => "🔴",
        "High" => "🟠",
        "Medium" => "🟡",
        "Low" => "🟢",
        _ => "⚪",
    }
}

fn severity_block(out: &mut String, title: &str, issues: &[SeverityCount]) {
    if issues.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", title);
    for issue in issues {
        let severity = issue.severity();
        let _ = writeln!(out, "   {} {}: {}", severity_icon(severity), severity, issue.count);
    }
    out.push('\n');
}

/// Render the model vulnerability summary
pub fn model_vulnerabilities(summary: &ModelIssuesSummary) -> String {
    let mut out = String::from(" AI/ML Model Security Vulnerabilities\n");
    let _ = writeln!(out, "{}\n", rule());
    let _ = writeln!(out, "   Summary: {} total issues", summary.total);
    let _ = writeln!(out, "   ML Models: {}", summary.ml_total);
    let _ = writeln!(out, "   LLM Models: {}", summary.llm_total);
    let _ = writeln!(out, "   Datasets: {}\n", summary.dataset_total);

    severity_block(&mut out, " ML Model Issues", &summary.ml_model_issues);
    severity_block(&mut out, "LLM Model Issues", &summary.llm_model_issues);
    severity_block(&mut out, "Dataset Issues", &summary.dataset_issues);

    out.trim_end_matches('\n').to_string() + "\n"
}

/// Render the AI model inventory as deployed / undeployed name lists
pub fn ai_assets(inventory: &AiAssetInventory) -> String {
    let models = inventory.models();

    let mut deployed: Vec<&str> = models.iter().filter(|m| m.deployed).map(|m| m.name.as_str()).collect();
    let mut undeployed: Vec<&str> = models.iter().filter(|m| !m.deployed).map(|m| m.name.as_str()).collect();
    deployed.sort_unstable();
    undeployed.sort_unstable();

    let mut total = inventory.reported_total();
    if total == 0 {
        total = models.len() as u64;
    }

    let mut out = String::from(" AI Model Assets\n");
    let _ = writeln!(out, "{}\n", rule());
    let _ = writeln!(out, "   Total Models Found: {}\n", total);

    if !deployed.is_empty() {
        let _ = writeln!(out, "Deployed Models ({}):", deployed.len());
        for name in &deployed {
            let _ = writeln!(out, "      - {}", name);
        }
        out.push('\n');
    }

    if !undeployed.is_empty() {
        let _ = writeln!(out, "Undeployed/Other Models ({}):", undeployed.len());
        for name in undeployed.iter().take(UNDEPLOYED_DISPLAY_LIMIT) {
            let _ = writeln!(out, "      - {}", name);
        }
        if undeployed.len() > UNDEPLOYED_DISPLAY_LIMIT {
            let _ = writeln!(
                out,
                "      ... and {} more.",
                undeployed.len() - UNDEPLOYED_DISPLAY_LIMIT
            );
        }
    }

    out
}
