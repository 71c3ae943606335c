//! Tools that agents can call through function calling.
//!
//! A [`Tool`] is written with typed arguments and output. Agents hold tools
//! as [`ErasedTool`] trait objects, which take a model-issued [`ToolCall`]
//! and always produce a [`ToolResult`]: bad arguments and tool failures are
//! part of the result, so the model can read them and try again.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use crew::Tool;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct SearchArgs {
//!     query: String,
//! }
//!
//! struct WebSearch;
//!
//! #[async_trait]
//! impl Tool for WebSearch {
//!     const NAME: &'static str = "web_search";
//!     type Args = SearchArgs;
//!     type Output = Vec<String>;
//!     type Error = String;
//!
//!     fn description(&self) -> &str {
//!         "Search the web"
//!     }
//!
//!     async fn call(&self, args: SearchArgs) -> Result<Vec<String>, String> {
//!         Ok(vec![format!("Results for: {}", args.query)])
//!     }
//! }
//! ```

use std::fmt::Display;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::schema::ToolSchema;
use crate::types::ToolCall;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name the model calls.
    const NAME: &'static str;

    type Args: DeserializeOwned + JsonSchema + Send;
    type Output: Serialize + Send;
    type Error: Display + Send;

    fn description(&self) -> &str;

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;
}

/// A tool as an agent sees it.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;

    /// Entry for the `tools` array of a chat request.
    fn function_spec(&self) -> Value;

    /// Run one call requested by the model.
    async fn invoke(&self, call: &ToolCall) -> ToolResult;
}

/// Why a tool call produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{tool}' failed: {reason}")]
    Failed { tool: String, reason: String },
}

/// Outcome of one tool call, ready to go back into the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    /// JSON output of the tool, or why there is none
    pub outcome: Result<String, ToolError>,
}

impl ToolResult {
    /// Result for a call naming a tool the agent does not have.
    pub fn unknown(call: &ToolCall) -> Self {
        Self {
            call_id: call.id.clone(),
            outcome: Err(ToolError::UnknownTool(call.name.clone())),
        }
    }

    /// What the model reads.
    pub fn content(&self) -> String {
        match &self.outcome {
            Ok(output) => output.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }

    /// The `tool` role message answering the call.
    pub fn to_message(&self) -> Value {
        json!({
            "role": "tool",
            "tool_call_id": self.call_id,
            "content": self.content(),
        })
    }
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn function_spec(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": T::NAME,
                "description": self.description(),
                "parameters": T::Args::strict_schema(),
            }
        })
    }

    async fn invoke(&self, call: &ToolCall) -> ToolResult {
        // Some models send an empty string for argument-less calls
        let arguments = match call.arguments.trim() {
            "" => "{}",
            raw => raw,
        };

        let outcome = match serde_json::from_str::<T::Args>(arguments) {
            Err(e) => Err(ToolError::InvalidArguments {
                tool: T::NAME.to_string(),
                reason: e.to_string(),
            }),
            Ok(args) => match self.call(args).await {
                Ok(output) => serde_json::to_string(&output).map_err(|e| ToolError::Failed {
                    tool: T::NAME.to_string(),
                    reason: e.to_string(),
                }),
                Err(e) => Err(ToolError::Failed {
                    tool: T::NAME.to_string(),
                    reason: e.to_string(),
                }),
            },
        };

        ToolResult {
            call_id: call.id.clone(),
            outcome,
        }
    }
}
