// Company Research Crew - API Core
//
// Accepts lists of companies and positions, researches them in the background
// with a crew of LLM agents, and exposes polling endpoints for job progress.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
