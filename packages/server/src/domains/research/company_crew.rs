//! Company research crew: wires agents and tasks together and runs them for a job.

use std::sync::Arc;

use crew::{Crew, TaskObserver, TaskOutput};
use tracing::{error, info, warn};

use super::agents::ResearchAgents;
use super::tasks::ResearchTasks;
use crate::kernel::{JobId, JobStore, ServerDeps};

/// Records each finished task in the job's event log.
struct JobEventObserver {
    job_id: JobId,
    store: JobStore,
}

impl TaskObserver for JobEventObserver {
    fn on_task_complete(&self, output: &TaskOutput) {
        let event = format!("TASK_COMPLETED: {}\n\n{}", output.name, output.raw);
        if let Err(e) = self.store.append_event(&self.job_id, event) {
            warn!(job_id = %self.job_id, error = %e, "Failed to record task event");
        }
    }
}

/// A crew researching a set of companies for one job.
pub struct CompanyResearchCrew {
    job_id: JobId,
    store: JobStore,
    deps: ServerDeps,
    crew: Option<Crew>,
}

impl CompanyResearchCrew {
    pub fn new(job_id: JobId, store: JobStore, deps: ServerDeps) -> Self {
        Self {
            job_id,
            store,
            deps,
            crew: None,
        }
    }

    /// Build one research task per company and a manager task over all of them.
    ///
    /// Makes no LLM calls. Duplicate companies are researched once.
    pub fn setup(&mut self, companies: &[String], positions: &[String]) -> crew::Result<()> {
        info!(
            job_id = %self.job_id,
            companies = ?companies,
            positions = ?positions,
            "Setting up research crew"
        );

        let mut unique: Vec<String> = Vec::with_capacity(companies.len());
        for company in companies {
            if !unique.contains(company) {
                unique.push(company.clone());
            }
        }

        let agents = ResearchAgents::new(&self.deps);
        let research_manager = agents.research_manager(&unique, positions);
        let company_research_agent = agents.company_research_agent();

        let tasks = ResearchTasks;
        let research_tasks: Vec<_> = unique
            .iter()
            .map(|company| tasks.company_research(company_research_agent.clone(), company, positions))
            .collect();
        let manage_task =
            tasks.manage_research(research_manager.clone(), &unique, positions, &research_tasks);

        let crew = Crew::builder()
            .agent(research_manager)
            .agent(company_research_agent)
            .tasks(research_tasks)
            .task(manage_task)
            .observer(Arc::new(JobEventObserver {
                job_id: self.job_id.clone(),
                store: self.store.clone(),
            }))
            .verbose(true)
            .build()?;

        self.crew = Some(crew);
        Ok(())
    }

    /// Run the crew. `Ok` carries the final report, `Err` the failure cause.
    pub async fn run(&self) -> Result<String, String> {
        let Some(crew) = &self.crew else {
            let message = format!("No crew found for {}", self.job_id);
            warn!(job_id = %self.job_id, "{}", message);
            return Err(message);
        };

        self.event("CREW_STARTED".to_string());
        info!(job_id = %self.job_id, "Running crew");

        match crew.kickoff().await {
            Ok(output) => {
                self.event("CREW_COMPLETED".to_string());
                Ok(output.raw)
            }
            Err(e) => {
                error!(job_id = %self.job_id, error = %e, "Crew run failed");
                self.event(format!("CREW_ERROR: {}", e));
                Err(e.to_string())
            }
        }
    }

    fn event(&self, data: String) {
        if let Err(e) = self.store.append_event(&self.job_id, data) {
            warn!(job_id = %self.job_id, error = %e, "Failed to append event");
        }
    }
}
