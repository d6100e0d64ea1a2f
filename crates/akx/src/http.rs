//! HTTP client for the server's JSON routes.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::session::ToolSession;

#[derive(Debug, Deserialize)]
struct CallToolResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct HttpSession {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSession {
    pub fn new(base_url: &str, insecure: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// `GET /health`, returning the decoded body
    pub async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

impl ToolSession for HttpSession {
    async fn call(&self, name: &str, arguments: Value) -> Result<String> {
        let url = format!("{}/call_tool", self.base_url);
        debug!("POST {} tool={}", url, name);

        let response = self
            .client
            .post(&url)
            .json(&json!({"tool": name, "arguments": arguments}))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: CallToolResponse = response.json().await?;
            return Ok(body.result);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn describe(&self) -> String {
        format!("http ({})", self.base_url)
    }
}
