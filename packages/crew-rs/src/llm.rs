//! Chat model seam and the OpenAI-compatible HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::types::{AssistantMessage, ChatRequest};
use crate::{CrewError, Result};

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Gemini Flash, cheap and fast enough for research loops.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Anything that can answer a chat completion request.
///
/// Agents only ever talk to this trait, which keeps them testable without a
/// network (see the `testing` feature).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier used for logging.
    fn model_name(&self) -> &str;

    /// Run one chat completion and return the assistant turn.
    async fn complete(&self, request: ChatRequest) -> Result<AssistantMessage>;
}

/// HTTP client for OpenAI-compatible chat completion APIs.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    /// Create a client with the default base URL and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| CrewError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (OpenAI, proxies, local servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": request.messages,
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::Value::Array(request.tools.clone());
            body["tool_choice"] = serde_json::json!("auto");
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<AssistantMessage> {
        let start = std::time::Instant::now();
        let body = self.request_body(&request);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                CrewError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(CrewError::Api(format!("{}: {}", status, error_text)));
        }

        let mut payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CrewError::Parse(e.to_string()))?;

        let message = payload
            .get_mut("choices")
            .and_then(|c| c.get_mut(0))
            .and_then(|c| c.get_mut("message"))
            .map(serde_json::Value::take)
            .ok_or_else(|| CrewError::Api("No choices in chat completion response".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(AssistantMessage::from_openai_value(message))
    }
}
