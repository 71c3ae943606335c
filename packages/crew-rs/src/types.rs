//! Chat request and response types shared by models and agents.

use serde_json::{json, Value};

/// A single chat completion request.
///
/// Messages and tool definitions are kept in the OpenAI wire format so the
/// agent loop can append assistant and tool messages verbatim.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Conversation messages (`{"role": ..., "content": ...}`)
    pub messages: Vec<Value>,

    /// Tool definitions in OpenAI function format
    pub tools: Vec<Value>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a request from a message history.
    pub fn new(messages: Vec<Value>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Attach tool definitions.
    pub fn tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Content of the last user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.get("role").and_then(|r| r.as_str()) == Some("user"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Call id, echoed back in the tool result message
    pub id: String,
    pub name: String,
    /// Raw JSON argument string
    pub arguments: String,
}

impl ToolCall {
    /// Parse an entry of `message.tool_calls`.
    fn from_openai_value(value: &Value) -> Option<Self> {
        let function = value.get("function")?;
        Some(Self {
            id: value.get("id")?.as_str()?.to_string(),
            name: function.get("name")?.as_str()?.to_string(),
            arguments: function.get("arguments")?.as_str()?.to_string(),
        })
    }
}

/// The assistant turn returned by a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantMessage {
    /// Text content, absent when the model only requested tools
    pub content: Option<String>,

    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantMessage {
    /// Parse the `message` object of a chat completion choice.
    pub fn from_openai_value(message: Value) -> Self {
        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .map(str::to_string);

        let tool_calls = message
            .get("tool_calls")
            .and_then(|tc| tc.as_array())
            .map(|calls| calls.iter().filter_map(ToolCall::from_openai_value).collect())
            .unwrap_or_default();

        Self {
            content,
            tool_calls,
        }
    }

    /// Build a plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// This turn as a history entry for the next request.
    pub fn to_message(&self) -> Value {
        let mut message = json!({ "role": "assistant", "content": self.content });
        if !self.tool_calls.is_empty() {
            message["tool_calls"] = self
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments },
                    })
                })
                .collect();
        }
        message
    }
}
