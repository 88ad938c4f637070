//! Anthropic Claude API client for claim extraction and verdict judging
//!
//! The pipeline only needs two narrow capabilities from a model, expressed as
//! the `LanguageModel` trait so tests can substitute deterministic fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::settings;

/// Narrow model capability interface used by the pipeline
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt expecting a JSON object back
    async fn complete_structured(&self, prompt: &str) -> Result<serde_json::Value, String>;

    /// Send a prompt expecting free text back
    async fn complete_text(&self, prompt: &str) -> Result<String, String>;
}

/// Anthropic API message format
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic API request format
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

/// Anthropic API response format
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    /// Create a client from settings. Returns None if no API key is configured.
    pub fn from_settings() -> Option<Self> {
        let api_key = settings::get_anthropic_api_key()?;
        Some(Self::new(api_key, settings::get_model()))
    }

    pub fn new(api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key, model }
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self.client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        let api_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete_structured(&self, prompt: &str) -> Result<serde_json::Value, String> {
        let text = self.complete(prompt, 2000).await?;
        let json_text = strip_code_fences(&text);
        serde_json::from_str(&json_text)
            .map_err(|e| format!("Model returned malformed JSON: {}", e))
    }

    async fn complete_text(&self, prompt: &str) -> Result<String, String> {
        self.complete(prompt, 1000).await
    }
}

/// Strip markdown code fences the model sometimes wraps JSON in
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        trimmed
            .lines()
            .skip(1)
            .take_while(|l| !l.starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        trimmed.to_string()
    }
}
