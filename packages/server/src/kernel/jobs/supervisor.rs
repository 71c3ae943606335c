//! Fire-and-forget execution of job bodies.
//!
//! Each dispatched job runs on its own tokio task. The submitting request
//! never awaits it. Whatever the body does (returns a result, returns an
//! error, or panics), the supervisor records exactly one terminal transition.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::job::{JobId, JobOutcome, JobStatus};
use super::job_store::JobStore;

/// Spawns job bodies and records their outcome in the [`JobStore`].
#[derive(Clone)]
pub struct JobSupervisor {
    store: JobStore,
}

impl JobSupervisor {
    pub fn new(store: JobStore) -> Self {
        Self { store }
    }

    /// Run `body` in the background for an already registered job.
    ///
    /// `Ok(result)` finishes the job as COMPLETE, `Err(message)` as ERROR.
    /// A panic is caught at the task boundary and also finishes it as ERROR.
    /// The returned handle resolves to the recorded status, or `None` if the
    /// job was already terminal; dropping it detaches the task.
    pub fn dispatch<F>(&self, job_id: JobId, body: F) -> JoinHandle<Option<JobStatus>>
    where
        F: Future<Output = Result<String, String>> + Send + 'static,
    {
        let store = self.store.clone();
        info!(job_id = %job_id, "Dispatching background job");

        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(body).catch_unwind().await {
                Ok(result) => JobOutcome::from(result),
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(job_id = %job_id, panic = %message, "Background job panicked");
                    if let Err(e) = store.append_event(&job_id, format!("CREW_FAILED: {}", message)) {
                        warn!(job_id = %job_id, error = %e, "Failed to record panic event");
                    }
                    JobOutcome::Error(message)
                }
            };

            record(&store, &job_id, outcome)
        })
    }
}

fn record(store: &JobStore, job_id: &JobId, outcome: JobOutcome) -> Option<JobStatus> {
    match store.finish(job_id, outcome) {
        Ok(JobStatus::Error) => {
            warn!(job_id = %job_id, "Job finished with error");
            Some(JobStatus::Error)
        }
        Ok(status) => {
            info!(job_id = %job_id, status = ?status, "Job finished");
            Some(status)
        }
        Err(e) => {
            warn!(job_id = %job_id, error = %e, "Could not record job outcome");
            None
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "background job panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(store: &JobStore) -> JobId {
        let id = JobId::generate();
        store.create(id.clone()).unwrap();
        id
    }

    #[tokio::test]
    async fn ok_body_completes_job() {
        let store = JobStore::new();
        let id = registered(&store);
        let supervisor = JobSupervisor::new(store.clone());

        let status = supervisor
            .dispatch(id.clone(), async { Ok::<_, String>("{\"a\": 1}".to_string()) })
            .await
            .unwrap();

        assert_eq!(status, Some(JobStatus::Complete));
        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Complete);
        assert_eq!(job.result.as_deref(), Some("{\"a\": 1}"));
    }

    #[tokio::test]
    async fn err_body_fails_job_with_message() {
        let store = JobStore::new();
        let id = registered(&store);
        let supervisor = JobSupervisor::new(store.clone());

        supervisor
            .dispatch(id.clone(), async { Err::<String, _>("LLM provider unavailable".to_string()) })
            .await
            .unwrap();

        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.result.as_deref(), Some("LLM provider unavailable"));
    }

    #[tokio::test]
    async fn panicking_body_is_caught_and_recorded() {
        let store = JobStore::new();
        let id = registered(&store);
        let supervisor = JobSupervisor::new(store.clone());

        let status = supervisor
            .dispatch(id.clone(), async {
                if true {
                    panic!("crew exploded");
                }
                Ok::<_, String>(String::new())
            })
            .await
            .unwrap();

        assert_eq!(status, Some(JobStatus::Error));
        let job = store.get(&id).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.result.as_deref(), Some("crew exploded"));
        assert_eq!(job.events.last().unwrap().data, "CREW_FAILED: crew exploded");
    }

    #[tokio::test]
    async fn second_outcome_is_not_recorded() {
        let store = JobStore::new();
        let id = registered(&store);
        store.finish(&id, JobOutcome::Error("first".into())).unwrap();
        let supervisor = JobSupervisor::new(store.clone());

        let status = supervisor
            .dispatch(id.clone(), async { Ok::<_, String>("second".to_string()) })
            .await
            .unwrap();

        assert_eq!(status, None);
        assert_eq!(store.get(&id).unwrap().result.as_deref(), Some("first"));
    }
}
