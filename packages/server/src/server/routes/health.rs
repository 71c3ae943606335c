use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::kernel::JobCounts;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    jobs: JobCounts,
}

/// Health check endpoint
///
/// Always 200 while the process is serving; reports job counts by status.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        jobs: state.jobs.counts(),
    })
}
