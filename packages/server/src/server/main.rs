// Main entry point for the company research API server

use std::sync::Arc;

use anyhow::{Context, Result};
use crew::{ChatModel, LlmClient};
use server_core::kernel::{BaseSearchService, ServerDeps, TavilyClient};
use server_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,crew=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Company Research API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let mut llm = LlmClient::new(config.gemini_api_key.clone());
    if let Some(base_url) = &config.llm_base_url {
        llm = llm.with_base_url(base_url.as_str());
    }
    if let Some(model) = &config.llm_model {
        llm = llm.with_model(model.as_str());
    }
    tracing::info!(model = %llm.model_name(), base_url = %llm.base_url(), "LLM client ready");

    let search: Option<Arc<dyn BaseSearchService>> = match &config.tavily_api_key {
        Some(key) => Some(Arc::new(
            TavilyClient::new(key.clone()).context("Failed to create Tavily client")?,
        )),
        None => {
            tracing::warn!("TAVILY_API_KEY not set, agents will run without web search");
            None
        }
    };

    let deps = ServerDeps::new(Arc::new(llm), search)
        .with_agent_max_iterations(config.agent_max_iterations);

    // Build application
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
