//! Crew job endpoints: submit a research job and poll its progress.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::domains::research::kickoff_crew;
use crate::kernel::{Event, JobId, JobStatus};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SubmitCrewRequest {
    pub companies: Option<Vec<String>>,
    pub positions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SubmitCrewResponse {
    pub status: &'static str,
    pub job_id: JobId,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// ISO-8601 with local offset
    pub timestamp: String,
    pub data: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339(),
            data: event.data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub result: Value,
    pub events: Vec<EventResponse>,
}

/// Start a research job.
///
/// The job is registered before this returns, so the id is immediately
/// resolvable; the crew itself runs in the background.
pub async fn submit_crew_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SubmitCrewRequest>, JsonRejection>,
) -> Result<Json<SubmitCrewResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let (companies, positions) = match (request.companies, request.positions) {
        (Some(companies), Some(positions)) => (companies, positions),
        _ => {
            return Err(ApiError::Validation(
                "Invalid request with missing data".to_string(),
            ))
        }
    };

    let job_id = JobId::generate();
    state
        .jobs
        .create(job_id.clone())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(
        job_id = %job_id,
        companies = ?companies,
        positions = ?positions,
        "Research job submitted"
    );

    // Detached: the handle is dropped and the supervisor records the outcome.
    state.supervisor.dispatch(
        job_id.clone(),
        kickoff_crew(
            state.jobs.clone(),
            (*state.deps).clone(),
            job_id.clone(),
            companies,
            positions,
        ),
    );

    Ok(Json(SubmitCrewResponse {
        status: "success",
        job_id,
    }))
}

/// Current status, result and event log of a job.
pub async fn fetch_crew_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job_id = JobId::from(job_id);
    let job = state.jobs.get(&job_id).map_err(|_| ApiError::NotFound)?;

    Ok(Json(JobResponse {
        job_id: job.id,
        status: job.status,
        result: interpret_result(job.result.as_deref()),
        events: job.events.into_iter().map(EventResponse::from).collect(),
    }))
}

/// Parse a stored result as JSON, falling back to the raw text.
///
/// Models often wrap their JSON in a Markdown code fence, which is removed
/// before parsing.
pub fn interpret_result(result: Option<&str>) -> Value {
    let Some(raw) = result else {
        return Value::Null;
    };

    if let Ok(value) = serde_json::from_str(raw) {
        return value;
    }

    strip_code_fence(raw)
        .and_then(|inner| serde_json::from_str(inner).ok())
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn strip_code_fence(raw: &str) -> Option<&str> {
    let inner = raw.trim().strip_prefix("```")?.strip_suffix("```")?;
    // Drop the info string (e.g. "json") on the opening line
    let inner = match inner.split_once('\n') {
        Some((info, rest)) if !info.trim_start().starts_with(['{', '[']) => rest,
        _ => inner,
    };
    Some(inner.trim())
}
