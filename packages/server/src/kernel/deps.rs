//! Server dependencies for crew runs (using traits for testability)
//!
//! The LLM and the search provider are trait objects so tests can swap in
//! scripted implementations.

use std::sync::Arc;

use crew::ChatModel;

use crate::kernel::tavily_client::NoopSearchService;
use crate::kernel::traits::BaseSearchService;

/// Default upper bound on tool-loop iterations per agent.
pub const DEFAULT_AGENT_MAX_ITERATIONS: usize = 15;

/// Dependencies handed to every crew run.
#[derive(Clone)]
pub struct ServerDeps {
    /// Chat model shared by all agents.
    pub llm: Arc<dyn ChatModel>,
    /// Web search backend. `None` means no API key was configured.
    pub search: Option<Arc<dyn BaseSearchService>>,
    pub agent_max_iterations: usize,
}

impl ServerDeps {
    pub fn new(llm: Arc<dyn ChatModel>, search: Option<Arc<dyn BaseSearchService>>) -> Self {
        Self {
            llm,
            search,
            agent_max_iterations: DEFAULT_AGENT_MAX_ITERATIONS,
        }
    }

    pub fn with_agent_max_iterations(mut self, max: usize) -> Self {
        self.agent_max_iterations = max;
        self
    }

    /// The configured search backend, or a no-op one that returns nothing.
    pub fn searcher(&self) -> Arc<dyn BaseSearchService> {
        match &self.search {
            Some(search) => search.clone(),
            None => Arc::new(NoopSearchService),
        }
    }
}
