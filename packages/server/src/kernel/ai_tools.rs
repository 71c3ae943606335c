//! Search tools for research agents.
//!
//! These tools implement the `crew::Tool` trait and are handed to agents for
//! their tool-calling loops.

use std::sync::Arc;

use async_trait::async_trait;
use crew::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::traits::{BaseSearchService, SearchOptions};

const MAX_RESULTS: usize = 5;

/// Error type for AI tools.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Web search failed: {0}")]
    WebSearch(String),

    #[error("YouTube search failed: {0}")]
    YoutubeSearch(String),
}

/// Arguments shared by the search tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// The search query.
    pub query: String,
}

/// A single search result as shown to the model.
#[derive(Debug, Serialize)]
pub struct SearchResultOutput {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

// =============================================================================
// Web Search Tool
// =============================================================================

/// Tool for searching the web, used to find people and their articles.
pub struct WebSearchTool {
    searcher: Arc<dyn BaseSearchService>,
}

impl WebSearchTool {
    pub fn new(searcher: Arc<dyn BaseSearchService>) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    const NAME: &'static str = "web_search";
    type Args = SearchArgs;
    type Output = Vec<SearchResultOutput>;
    type Error = ToolError;

    fn description(&self) -> &str {
        "Search the internet. Use this to find who holds a position at a company and \
         blog articles or posts written by or about them."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let options = SearchOptions {
            max_results: Some(MAX_RESULTS),
            ..Default::default()
        };
        let results = self
            .searcher
            .search(&args.query, &options)
            .await
            .map_err(|e| ToolError::WebSearch(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|r| SearchResultOutput {
                url: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }
}

// =============================================================================
// YouTube Search Tool
// =============================================================================

/// Tool for finding YouTube interviews, restricted to youtube.com.
pub struct YoutubeSearchTool {
    searcher: Arc<dyn BaseSearchService>,
}

impl YoutubeSearchTool {
    pub fn new(searcher: Arc<dyn BaseSearchService>) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Tool for YoutubeSearchTool {
    const NAME: &'static str = "youtube_search";
    type Args = SearchArgs;
    type Output = Vec<SearchResultOutput>;
    type Error = ToolError;

    fn description(&self) -> &str {
        "Search YouTube for videos. Use this to find interviews with a specific person."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let options = SearchOptions {
            max_results: Some(MAX_RESULTS),
            include_domains: vec!["youtube.com".to_string()],
            ..Default::default()
        };
        let results = self
            .searcher
            .search(&args.query, &options)
            .await
            .map_err(|e| ToolError::YoutubeSearch(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|r| SearchResultOutput {
                url: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }
}
