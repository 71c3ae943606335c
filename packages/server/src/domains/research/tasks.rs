//! Task definitions for company research.

use std::sync::Arc;

use crew::{Agent, Task};

/// Output shape the front end renders, keyed by company then position.
const REPORT_SHAPE: &str = r#"{
  "<company>": {
    "<position>": {
      "name": "<person holding the position>",
      "blog_articles": ["<url>", "<url>", "<url>"],
      "youtube_interviews": [
        {"url": "<url>", "title": "<title>"}
      ]
    }
  }
}"#;

/// Builds the tasks of a research crew.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResearchTasks;

impl ResearchTasks {
    pub fn task_name(company: &str) -> String {
        format!("research:{}", company)
    }

    /// Find the people in `positions` at `company` and their recent content.
    pub fn company_research(&self, agent: Arc<Agent>, company: &str, positions: &[String]) -> Task {
        Task::new(
            Self::task_name(company),
            format!(
                "Research the position(s) {} for the company {}. For each position, find the \
                 name of the person holding it, the urls for 3 recent blog articles and the \
                 url and title for 3 recent YouTube interviews.\n\n\
                 Return the collected information as a JSON object.",
                positions.join(", "),
                company
            ),
            format!(
                "A JSON object for {} with the following structure:\n{}\n\
                 Use \"MISSING\" for any value you could not find.",
                company, REPORT_SHAPE
            ),
            agent,
        )
    }

    /// Aggregate every company research task into the final report.
    pub fn manage_research(
        &self,
        manager: Arc<Agent>,
        companies: &[String],
        positions: &[String],
        research_tasks: &[Task],
    ) -> Task {
        Task::new(
            "manage_research",
            format!(
                "Based on the list of companies {} and the positions {}, use the results from \
                 the Company Research Agent to research each position in each company and put \
                 together a single JSON object.",
                companies.join(", "),
                positions.join(", ")
            ),
            format!(
                "A single JSON object with the following structure and nothing else, \
                 no prose and no Markdown:\n{}",
                REPORT_SHAPE
            ),
            manager,
        )
        .with_context(research_tasks)
    }
}
