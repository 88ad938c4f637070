//! Tavily web search API client
//!
//! API Documentation: https://docs.tavily.com/documentation/api-reference
//! One POST per claim, "advanced" depth, up to 5 ranked results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::settings;

/// A single ranked search result snippet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub url: String,
}

/// Narrow search capability interface used by the pipeline
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String>;
}

/// Tavily API request body
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Option<Vec<RawResult>>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    content: Option<String>,
    url: Option<String>,
}

pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    /// Create a client from settings. Returns None if no API key is configured.
    pub fn from_settings() -> Option<Self> {
        settings::get_tavily_api_key().map(Self::new)
    }

    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://api.tavily.com/search".to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String> {
        println!("[Tavily] Searching: \"{}\"", query);

        let request = TavilyRequest {
            query,
            search_depth: "advanced",
            max_results,
        };

        let response = self.client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        let api_response: TavilyResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        let hits: Vec<SearchHit> = api_response
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| {
                let url = raw.url?;
                Some(SearchHit {
                    content: raw.content.unwrap_or_default(),
                    url,
                })
            })
            .collect();

        println!("[Tavily]   Fetched {} results", hits.len());
        Ok(hits)
    }
}
