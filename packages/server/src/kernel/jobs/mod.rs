//! Job infrastructure for background crew runs.
//!
//! - [`JobStore`] - shared registry of jobs and their event logs
//! - [`JobSupervisor`] - spawns job bodies and records their terminal outcome
//! - [`Job`] - job model (status, result, events)
//!
//! # Architecture
//!
//! ```text
//! POST /api/crew
//!     │
//!     ├─► JobStore.create(id)            (before the response is sent)
//!     └─► JobSupervisor.dispatch(id, body)
//!             └─► tokio task
//!                     ├─► body appends events via JobStore.append_event
//!                     └─► JobStore.finish(id, outcome)   (exactly once)
//!
//! GET /api/crew/:id
//!     └─► JobStore.get(id)               (snapshot)
//! ```

mod job;
mod job_store;
mod supervisor;

pub use job::{Event, Job, JobId, JobOutcome, JobStatus};
pub use job_store::{JobCounts, JobStore, JobStoreError};
pub use supervisor::JobSupervisor;
