// * Hosted LLM client (OpenAI Responses API)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// * Completions can take far longer than portal requests
const COMPLETION_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response carried no output text")]
    EmptyOutput,

    #[error("API key is empty")]
    EmptyApiKey,
}

/// One system + user exchange with a hosted model
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, SummarizerError>;
}

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, SummarizerError> {
        if api_key.trim().is_empty() {
            return Err(SummarizerError::EmptyApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn respond(&self, model: &str, system: &str, user: &str) -> Result<String, SummarizerError> {
        let url = format!("{}/responses", self.base_url);
        let payload = json!({
            "model": model,
            "input": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        debug!(model, "completion received");
        extract_output_text(&body).ok_or(SummarizerError::EmptyOutput)
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, SummarizerError> {
        self.respond(model, system, user).await
    }
}

/// Pulls the generated text out of a Responses API body
pub fn extract_output_text(body: &Value) -> Option<String> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let parts: Vec<&str> = body
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content")?.as_array())
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text")?.as_str())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}
