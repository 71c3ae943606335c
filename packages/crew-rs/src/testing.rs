//! Deterministic chat model for tests.
//!
//! Enabled with the `testing` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::llm::ChatModel;
use crate::types::{AssistantMessage, ChatRequest, ToolCall};
use crate::{CrewError, Result};

/// One scripted model turn.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
    Fail(String),
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// A single tool call with the given raw JSON arguments.
    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::ToolCalls(vec![ToolCall {
            id: String::new(),
            name: name.into(),
            arguments: arguments.into(),
        }])
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// A [`ChatModel`] that replays a script.
///
/// Replies are consumed in order; once the script runs out the fallback
/// reply is repeated (an API error unless built with [`ScriptedModel::replying`]
/// or [`ScriptedModel::failing`]).
pub struct ScriptedModel {
    script: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Arc<Semaphore>>,
    call_count: AtomicUsize,
}

impl ScriptedModel {
    pub fn from_script(replies: Vec<ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback: ScriptedReply::fail("script exhausted"),
            requests: Mutex::new(Vec::new()),
            gate: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Answer every request with the same text.
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            fallback: ScriptedReply::text(content),
            ..Self::from_script(Vec::new())
        }
    }

    /// Fail every request with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: ScriptedReply::fail(message),
            ..Self::from_script(Vec::new())
        }
    }

    /// Block every call until the semaphore has a permit.
    ///
    /// Start with `Semaphore::new(0)` and call `add_permits` to release.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> ScriptedReply {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ChatRequest) -> Result<AssistantMessage> {
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| CrewError::Network("gate closed".into()))?;
        }

        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match self.next_reply() {
            ScriptedReply::Text(content) => Ok(AssistantMessage::text(content)),
            ScriptedReply::ToolCalls(calls) => Ok(AssistantMessage {
                content: None,
                tool_calls: calls
                    .into_iter()
                    .enumerate()
                    .map(|(i, call)| ToolCall {
                        id: format!("call_{}_{}", n, i),
                        ..call
                    })
                    .collect(),
            }),
            ScriptedReply::Fail(message) => Err(CrewError::Api(message)),
        }
    }
}
