// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseSearchService)

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

// =============================================================================
// Search Trait (Infrastructure - Web search providers)
// =============================================================================

/// A single web search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// Options for a search call. `None` fields use the provider defaults.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub max_results: Option<usize>,
    /// "basic" or "advanced"
    pub search_depth: Option<String>,
    /// Restrict results to these domains
    pub include_domains: Vec<String>,
}

#[async_trait]
pub trait BaseSearchService: Send + Sync {
    /// Search the web
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>>;
}
