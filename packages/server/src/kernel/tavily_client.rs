use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BaseSearchService, SearchOptions, SearchResult};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Tavily API client for web search
pub struct TavilyClient {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

/// Tavily search depth
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum SearchDepth {
    Basic,
    Advanced,
}

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest {
    api_key: String,
    query: String,
    search_depth: SearchDepth,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

/// Individual search result from Tavily
#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
    score: f64,
    #[serde(default)]
    published_date: Option<String>,
}

impl TavilyClient {
    /// Create a new Tavily client
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            client,
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }

    /// Send searches to `endpoint` instead of the public Tavily API.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(&self, query: &str, options: &SearchOptions) -> TavilyRequest {
        let search_depth = match options.search_depth.as_deref() {
            Some("advanced") => SearchDepth::Advanced,
            _ => SearchDepth::Basic,
        };

        TavilyRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            search_depth,
            max_results: options.max_results,
            include_domains: options.include_domains.clone(),
        }
    }
}

#[async_trait]
impl BaseSearchService for TavilyClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let request = self.build_request(query, options);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to send Tavily search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error {}: {}", status, body);
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;

        tracing::debug!(
            query = %query,
            results = tavily_response.results.len(),
            "Tavily search complete"
        );

        let results = tavily_response
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
                published_date: r.published_date,
            })
            .collect();

        Ok(results)
    }
}

/// No-op search service for testing or when API key not configured
pub struct NoopSearchService;

#[async_trait]
impl BaseSearchService for NoopSearchService {
    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<SearchResult>> {
        tracing::warn!("NoopSearchService: search called but no Tavily API key configured");
        Ok(vec![])
    }
}
