//! Web search client backed by the Tavily API.

use crate::types::{AppError, Result, SearchHits};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const TAVILY_API_URL: &str = "https://api.tavily.com";

/// Issues one web search per call and returns the raw ranked hits.
///
/// No caching and no deduplication: an identical query string is always
/// re-issued, and two calls may legitimately return different results.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchHits>;
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: SearchHits,
}

/// Tavily-backed [`SearchClient`].
pub struct TavilySearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_results: usize,
}

impl TavilySearchClient {
    pub fn new(api_key: String, max_results: usize) -> Self {
        Self::with_base_url(TAVILY_API_URL.to_string(), api_key, max_results)
    }

    /// Point the client at a non-default endpoint. Used by tests.
    pub fn with_base_url(base_url: String, api_key: String, max_results: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            max_results,
        }
    }
}

#[async_trait]
impl SearchClient for TavilySearchClient {
    async fn search(&self, query: &str) -> Result<SearchHits> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": self.max_results,
            }))
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Tavily request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Tavily returned {}: {}",
                status, body
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Malformed Tavily response: {}", e)))?;

        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = TavilySearchClient::new("key".to_string(), 5);
        assert_eq!(client.base_url, TAVILY_API_URL);
        assert_eq!(client.max_results, 5);
    }

    #[test]
    fn test_response_defaults_to_empty_results() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
