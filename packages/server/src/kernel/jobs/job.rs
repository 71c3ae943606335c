//! Job model for background crew runs.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque job identifier handed to clients.
///
/// Generated ids are UUID v4 strings, but any string can be looked up so that
/// malformed ids from clients simply resolve to "not found".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Running,
    Complete,
    Error,
}

impl JobStatus {
    /// COMPLETE and ERROR never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

/// Terminal outcome of a job, recorded exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Crew output, usually JSON text
    Complete(String),
    /// Failure explanation
    Error(String),
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Complete(_) => JobStatus::Complete,
            JobOutcome::Error(_) => JobStatus::Error,
        }
    }

    pub fn into_result(self) -> String {
        match self {
            JobOutcome::Complete(result) | JobOutcome::Error(result) => result,
        }
    }
}

impl From<Result<String, String>> for JobOutcome {
    fn from(value: Result<String, String>) -> Self {
        match value {
            Ok(result) => JobOutcome::Complete(result),
            Err(error) => JobOutcome::Error(error),
        }
    }
}

// ============================================================================
// Job Model
// ============================================================================

/// Timestamped progress marker in a job's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub data: String,
}

impl Event {
    pub fn now(data: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            data: data.into(),
        }
    }
}

/// One research request and everything known about it so far.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub result: Option<String>,
    pub events: Vec<Event>,
}

impl Job {
    /// A freshly submitted job: RUNNING, no result, no events.
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Running,
            result: None,
            events: Vec::new(),
        }
    }
}
