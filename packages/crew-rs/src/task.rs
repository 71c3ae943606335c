//! Tasks: a unit of work assigned to one agent.

use std::sync::Arc;

use serde::Serialize;

use crate::agent::Agent;

/// A unit of work for an agent.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    description: String,
    expected_output: String,
    agent: Arc<Agent>,
    context: Vec<String>,
}

/// Output of a finished task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    /// Name of the task that produced this output
    pub name: String,
    pub agent_role: String,
    /// Final answer of the agent, verbatim
    pub raw: String,
}

impl Task {
    /// Create a task. `name` must be unique within a crew.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            context: Vec::new(),
        }
    }

    /// Feed the outputs of earlier tasks into this one.
    pub fn with_context<'a>(mut self, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        self.context
            .extend(tasks.into_iter().map(|t| t.name.clone()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    /// Names of the tasks this one depends on.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Prompt handed to the agent.
    pub(crate) fn prompt(&self, context_outputs: &[&TaskOutput]) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        );

        if !context_outputs.is_empty() {
            let context = context_outputs
                .iter()
                .map(|o| o.raw.as_str())
                .collect::<Vec<_>>()
                .join("\n\n----------\n\n");
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&context);
        }

        prompt
    }
}
