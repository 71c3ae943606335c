//! In-process job registry shared by the HTTP handlers and background runs.
//!
//! A single mutex guards the whole map. Critical sections are map lookups and
//! field assignments only; nothing awaits while holding the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;

use super::job::{Event, Job, JobId, JobOutcome, JobStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobStoreError {
    #[error("job already exists: {0}")]
    AlreadyExists(JobId),

    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("job {id} already finished as {status:?}")]
    AlreadyTerminal { id: JobId, status: JobStatus },
}

/// Number of jobs per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobCounts {
    pub running: usize,
    pub complete: usize,
    pub error: usize,
}

/// Cloneable handle to the job registry.
///
/// Entries are never evicted; the registry lives as long as the process.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the map. A panic in another holder cannot leave a job half
    /// written (every mutation is a single assignment or push), so a
    /// poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_job<T>(
        &self,
        id: &JobId,
        f: impl FnOnce(&mut Job) -> Result<T, JobStoreError>,
    ) -> Result<T, JobStoreError> {
        let mut jobs = self.lock();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))?;
        f(job)
    }

    /// Register a new RUNNING job with no result and no events.
    pub fn create(&self, id: JobId) -> Result<Job, JobStoreError> {
        let mut jobs = self.lock();
        if jobs.contains_key(&id) {
            return Err(JobStoreError::AlreadyExists(id));
        }
        let job = Job::new(id.clone());
        jobs.insert(id, job.clone());
        Ok(job)
    }

    /// Snapshot of a job.
    pub fn get(&self, id: &JobId) -> Result<Job, JobStoreError> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| JobStoreError::NotFound(id.clone()))
    }

    pub fn set_status(&self, id: &JobId, status: JobStatus) -> Result<(), JobStoreError> {
        self.with_job(id, |job| {
            job.status = status;
            Ok(())
        })
    }

    pub fn set_result(&self, id: &JobId, result: impl Into<String>) -> Result<(), JobStoreError> {
        let result = result.into();
        self.with_job(id, |job| {
            job.result = Some(result);
            Ok(())
        })
    }

    /// Append a timestamped event. Events for one job keep call order.
    pub fn append_event(&self, id: &JobId, message: impl Into<String>) -> Result<(), JobStoreError> {
        let event = Event::now(message);
        self.with_job(id, |job| {
            job.events.push(event);
            Ok(())
        })
    }

    /// Record the terminal transition. Status and result are written under one
    /// lock acquisition, and only if the job is still RUNNING.
    pub fn finish(&self, id: &JobId, outcome: JobOutcome) -> Result<JobStatus, JobStoreError> {
        self.with_job(id, |job| {
            if job.status.is_terminal() {
                return Err(JobStoreError::AlreadyTerminal {
                    id: job.id.clone(),
                    status: job.status,
                });
            }
            let status = outcome.status();
            job.status = status;
            job.result = Some(outcome.into_result());
            Ok(status)
        })
    }

    pub fn counts(&self) -> JobCounts {
        self.lock()
            .values()
            .fold(JobCounts::default(), |mut counts, job| {
                match job.status {
                    JobStatus::Running => counts.running += 1,
                    JobStatus::Complete => counts.complete += 1,
                    JobStatus::Error => counts.error += 1,
                }
                counts
            })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
