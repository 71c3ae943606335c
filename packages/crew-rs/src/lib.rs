//! Small multi-agent orchestration library.
//!
//! Agents are LLM-driven actors with a role, a goal and a set of tools.
//! Tasks are units of work assigned to an agent. A crew runs its tasks in
//! order, feeding the output of earlier tasks into later ones as context.
//!
//! The library talks to any OpenAI-compatible chat completions endpoint
//! through the [`ChatModel`] trait. [`LlmClient`] is the HTTP implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crew::{Agent, Crew, LlmClient, Task};
//!
//! let llm = Arc::new(LlmClient::from_env()?);
//!
//! let researcher = Arc::new(
//!     Agent::builder(llm.clone())
//!         .role("Company Research Agent")
//!         .goal("Find the people holding key positions")
//!         .backstory("You are a meticulous researcher")
//!         .tool(WebSearch)
//!         .build(),
//! );
//!
//! let research = Task::new("research:acme", "Research Acme", "A list of names", researcher.clone());
//!
//! let output = Crew::builder()
//!     .agent(researcher)
//!     .task(research)
//!     .build()?
//!     .kickoff()
//!     .await?;
//! ```

pub mod agent;
pub mod crew;
pub mod error;
pub mod llm;
pub mod schema;
pub mod task;
pub mod tool;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use agent::{Agent, AgentBuilder, AgentOutput};
pub use crew::{Crew, CrewBuilder, CrewOutput, TaskObserver};
pub use error::{CrewError, Result};
pub use llm::{ChatModel, LlmClient};
pub use schema::ToolSchema;
pub use task::{Task, TaskOutput};
pub use tool::{ErasedTool, Tool, ToolError, ToolResult};
pub use types::{AssistantMessage, ChatRequest, ToolCall};
