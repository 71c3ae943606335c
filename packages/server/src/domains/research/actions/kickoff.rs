//! Background body of a research job.

use tracing::info;

use crate::domains::research::CompanyResearchCrew;
use crate::kernel::{JobId, JobStore, ServerDeps};

/// Set up and run a research crew for `job_id`.
///
/// Returns the final report or the failure cause; the caller records it as
/// the job's terminal state.
pub async fn kickoff_crew(
    store: JobStore,
    deps: ServerDeps,
    job_id: JobId,
    companies: Vec<String>,
    positions: Vec<String>,
) -> Result<String, String> {
    info!(
        job_id = %job_id,
        companies = companies.len(),
        positions = positions.len(),
        "Running crew"
    );

    let mut crew = CompanyResearchCrew::new(job_id, store, deps);
    crew.setup(&companies, &positions).map_err(|e| e.to_string())?;
    crew.run().await
}
