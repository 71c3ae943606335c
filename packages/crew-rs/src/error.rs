//! Error types for crew orchestration.

use thiserror::Error;

/// Result type for crew operations.
pub type Result<T> = std::result::Result<T, CrewError>;

/// Crew errors.
#[derive(Debug, Error)]
pub enum CrewError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Model provider error (non-2xx response, rate limit, empty choice list)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Agent kept requesting tools past its iteration limit
    #[error("Agent '{role}' reached max iterations ({max})")]
    MaxIterations { role: String, max: usize },

    /// Crew definition is inconsistent (no tasks, bad context reference)
    #[error("Invalid crew: {0}")]
    InvalidCrew(String),
}
