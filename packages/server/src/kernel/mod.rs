//! Kernel module - server infrastructure and dependencies.

pub mod ai_tools;
pub mod deps;
pub mod jobs;
pub mod tavily_client;
pub mod traits;

pub use ai_tools::{WebSearchTool, YoutubeSearchTool};
pub use deps::{ServerDeps, DEFAULT_AGENT_MAX_ITERATIONS};
pub use jobs::{
    Event, Job, JobCounts, JobId, JobOutcome, JobStatus, JobStore, JobStoreError, JobSupervisor,
};
pub use tavily_client::{NoopSearchService, TavilyClient};
pub use traits::*;
