//! Research domain - company research crews run as background jobs.
//!
//! For each company a research agent looks up the people holding the
//! requested positions, then a manager agent compiles everything into one
//! JSON report. Progress is written to the job's event log.

pub mod actions;
pub mod agents;
pub mod company_crew;
pub mod tasks;

pub use actions::kickoff_crew;
pub use agents::ResearchAgents;
pub use company_crew::CompanyResearchCrew;
pub use tasks::ResearchTasks;
