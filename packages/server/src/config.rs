use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: String,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    pub tavily_api_key: Option<String>,
    pub agent_max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gemini_api_key: env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY must be set")?,
            llm_base_url: env::var("LLM_BASE_URL").ok(),
            llm_model: env::var("LLM_MODEL").ok(),
            tavily_api_key: env::var("TAVILY_API_KEY").ok().filter(|k| !k.is_empty()),
            agent_max_iterations: env::var("AGENT_MAX_ITERATIONS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("AGENT_MAX_ITERATIONS must be a valid number")?,
        })
    }
}
