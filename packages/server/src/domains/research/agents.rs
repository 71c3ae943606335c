//! Agent definitions for company research.

use std::sync::Arc;

use crew::{Agent, ChatModel, ErasedTool};
use tracing::warn;

use crate::kernel::{ServerDeps, WebSearchTool, YoutubeSearchTool};

/// Builds the agents that make up a research crew.
pub struct ResearchAgents {
    llm: Arc<dyn ChatModel>,
    tools: Vec<Arc<dyn ErasedTool>>,
    max_iterations: usize,
}

impl ResearchAgents {
    pub fn new(deps: &ServerDeps) -> Self {
        let tools: Vec<Arc<dyn ErasedTool>> = match &deps.search {
            Some(search) => vec![
                Arc::new(WebSearchTool::new(search.clone())),
                Arc::new(YoutubeSearchTool::new(search.clone())),
            ],
            None => {
                warn!("No search backend configured, research agents will run without tools");
                Vec::new()
            }
        };

        Self {
            llm: deps.llm.clone(),
            tools,
            max_iterations: deps.agent_max_iterations,
        }
    }

    /// Oversees the per-company research and compiles the final report.
    pub fn research_manager(&self, companies: &[String], positions: &[String]) -> Arc<Agent> {
        let builder = Agent::builder(self.llm.clone())
            .role("Company Research Manager")
            .goal(format!(
                "Generate a list of JSON objects containing the urls for 3 recent blog articles \
                 and the url and title for 3 recent YouTube interviews, for each position in \
                 each company.\n\nCompanies: {}\nPositions: {}\n\n\
                 Important:\n\
                 - The final list of JSON objects must include all companies and positions. \
                 Do not leave any out.\n\
                 - If you can't find information for a specific position, fill in the \
                 information with the word \"MISSING\".\n\
                 - Do not generate fake information. Only return the information you find. \
                 Nothing else!\n\
                 - Do not stop researching until you find the requested information for each \
                 position in each company.\n\
                 - All the companies and positions exist so keep researching until you find \
                 the information for each one.\n\
                 - Make sure each researched position for each company contains 3 blog \
                 articles and 3 YouTube interviews.",
                companies.join(", "),
                positions.join(", ")
            ))
            .backstory(
                "As a Company Research Manager, you are responsible for aggregating all the \
                 researched information into a list.",
            )
            .max_iterations(self.max_iterations);

        Arc::new(self.with_tools(builder).build())
    }

    /// Researches one company at a time.
    pub fn company_research_agent(&self) -> Arc<Agent> {
        let builder = Agent::builder(self.llm.clone())
            .role("Company Research Agent")
            .goal(
                "Look up the specific positions for a given company and find urls for 3 recent \
                 blog articles and the url and title for 3 recent YouTube interviews for each \
                 person in the specified positions. It is your job to return this collected \
                 information in a JSON object.",
            )
            .backstory(
                "As a Company Research Agent, you are responsible for looking up specific \
                 positions within a company and gathering relevant information.\n\n\
                 Important:\n\
                 - Once you've found the information, immediately stop searching for \
                 additional information.\n\
                 - Only return the requested information. NOTHING ELSE!\n\
                 - Make sure you find the persons name who holds the position.\n\
                 - Do not generate fake information. Only return the information you find. \
                 Nothing else!",
            )
            .max_iterations(self.max_iterations);

        Arc::new(self.with_tools(builder).build())
    }

    fn with_tools(&self, builder: crew::AgentBuilder) -> crew::AgentBuilder {
        self.tools
            .iter()
            .fold(builder, |b, tool| b.shared_tool(tool.clone()))
    }
}
