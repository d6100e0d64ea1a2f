//! Interactive tool menu.

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde_json::{json, Value};

use crate::session::ToolSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CountAssets,
    ListAssets,
    SearchByCategory,
    ModelVulnerabilities,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::CountAssets,
        MenuChoice::ListAssets,
        MenuChoice::SearchByCategory,
        MenuChoice::ModelVulnerabilities,
        MenuChoice::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::CountAssets => "Count all assets",
            MenuChoice::ListAssets => "List 5 assets",
            MenuChoice::SearchByCategory => "Search assets by category",
            MenuChoice::ModelVulnerabilities => "Get model vulnerabilities",
            MenuChoice::Quit => "Quit",
        }
    }

    /// Tool name and arguments for this choice; `None` for Quit
    pub fn request(&self, category: Option<&str>) -> Option<(&'static str, Value)> {
        match self {
            MenuChoice::CountAssets => Some(("search_assets", json!({"return_type": "count"}))),
            MenuChoice::ListAssets => Some(("search_assets", json!({"limit": 5}))),
            MenuChoice::SearchByCategory => Some((
                "search_assets",
                json!({"type_category": category.unwrap_or_default(), "limit": 3}),
            )),
            MenuChoice::ModelVulnerabilities => Some(("get_model_vulnerabilities", json!({}))),
            MenuChoice::Quit => None,
        }
    }
}

/// Run a blocking terminal prompt on the blocking pool
async fn prompt<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> Result<T, dialoguer::Error> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

fn select_choice() -> Result<Option<usize>, dialoguer::Error> {
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt("AccuKnox MCP")
        .items(&labels)
        .default(0)
        .interact_opt()
}

fn input_category() -> Result<String, dialoguer::Error> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Category (e.g. Models, Compute, Storage)")
        .default("Models".to_string())
        .interact_text()
}

/// Loop until the user quits or closes the prompt
pub async fn run<S: ToolSession>(session: &S) -> anyhow::Result<()> {
    println!("{} {}", "Connected:".cyan().bold(), session.describe());

    loop {
        println!();
        let Some(index) = prompt(select_choice).await? else {
            break;
        };

        let choice = MenuChoice::ALL[index];
        let category = if choice == MenuChoice::SearchByCategory {
            Some(prompt(input_category).await?)
        } else {
            None
        };

        let Some((tool, arguments)) = choice.request(category.as_deref()) else {
            break;
        };

        println!("{}", format!("→ {} {}", tool, arguments).dimmed());
        match session.call(tool, arguments).await {
            Ok(text) => println!("{}", text),
            Err(e) => println!("{} {}", "✗".red(), e.to_string().red()),
        }
    }

    println!("{}", "Bye.".dimmed());
    Ok(())
}
