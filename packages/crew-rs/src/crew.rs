//! Crews: a group of agents working through an ordered list of tasks.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::agent::Agent;
use crate::task::{Task, TaskOutput};
use crate::{CrewError, Result};

/// Receives task outputs as the crew makes progress.
pub trait TaskObserver: Send + Sync {
    fn on_task_complete(&self, output: &TaskOutput);
}

/// Result of a crew run.
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// Output of the last task
    pub raw: String,

    /// Every task output, in execution order
    pub tasks_output: Vec<TaskOutput>,
}

/// Builder for a [`Crew`].
#[derive(Default)]
pub struct CrewBuilder {
    agents: Vec<Arc<Agent>>,
    tasks: Vec<Task>,
    observers: Vec<Arc<dyn TaskObserver>>,
    verbose: bool,
}

impl CrewBuilder {
    pub fn agent(mut self, agent: Arc<Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Log every task output at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and build the crew.
    ///
    /// Task names must be unique and context may only reference tasks that
    /// run earlier.
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(CrewError::InvalidCrew("crew has no tasks".into()));
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (idx, task) in self.tasks.iter().enumerate() {
            for dep in task.context() {
                if !seen.contains_key(dep.as_str()) {
                    return Err(CrewError::InvalidCrew(format!(
                        "task '{}' depends on '{}' which does not run before it",
                        task.name(),
                        dep
                    )));
                }
            }
            if seen.insert(task.name(), idx).is_some() {
                return Err(CrewError::InvalidCrew(format!(
                    "duplicate task name '{}'",
                    task.name()
                )));
            }
        }

        for task in &self.tasks {
            if !self.agents.iter().any(|a| Arc::ptr_eq(a, task.agent())) {
                warn!(
                    task = %task.name(),
                    role = %task.agent().role(),
                    "Task agent is not a crew member"
                );
            }
        }

        info!(agents = self.agents.len(), tasks = self.tasks.len(), "Crew assembled");
        Ok(Crew {
            tasks: self.tasks,
            observers: self.observers,
            verbose: self.verbose,
        })
    }
}

/// A group of agents and the tasks they work through, one after another.
pub struct Crew {
    tasks: Vec<Task>,
    observers: Vec<Arc<dyn TaskObserver>>,
    verbose: bool,
}

impl Crew {
    pub fn builder() -> CrewBuilder {
        CrewBuilder::default()
    }

    /// Run every task in definition order and return the final output.
    ///
    /// The first failing task aborts the run.
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let context: Vec<&TaskOutput> = task
                .context()
                .iter()
                .filter_map(|dep| outputs.iter().find(|o| &o.name == dep))
                .collect();

            info!(task = %task.name(), role = %task.agent().role(), "Task started");
            let agent_output = task.agent().execute(&task.prompt(&context)).await?;

            let output = TaskOutput {
                name: task.name().to_string(),
                agent_role: task.agent().role().to_string(),
                raw: agent_output.content,
            };

            if self.verbose {
                info!(task = %output.name, output = %output.raw, "Task completed");
            } else {
                info!(task = %output.name, output_len = output.raw.len(), "Task completed");
            }

            for observer in &self.observers {
                observer.on_task_complete(&output);
            }
            outputs.push(output);
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }
}
