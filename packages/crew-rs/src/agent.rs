//! Agents: an LLM persona with tools and an automatic tool-calling loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm::ChatModel;
use crate::tool::{ErasedTool, Tool, ToolResult};
use crate::types::ChatRequest;
use crate::{CrewError, Result};

/// Builder for creating an [`Agent`].
pub struct AgentBuilder {
    llm: Arc<dyn ChatModel>,
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<Arc<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
}

impl AgentBuilder {
    fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            role: String::new(),
            goal: String::new(),
            backstory: String::new(),
            tools: Vec::new(),
            max_iterations: 15,
            temperature: None,
        }
    }

    /// Who the agent is ("Company Research Agent").
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// What the agent is trying to achieve.
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Background that shapes how the agent works.
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Add a tool owned by this agent.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Add a tool shared with other agents.
    pub fn shared_tool(mut self, tool: Arc<dyn ErasedTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Maximum number of model calls per task. Default is 15.
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn build(self) -> Agent {
        Agent {
            llm: self.llm,
            role: self.role,
            goal: self.goal,
            backstory: self.backstory,
            tools: self.tools,
            max_iterations: self.max_iterations,
            temperature: self.temperature,
        }
    }
}

/// An LLM-driven actor that works on tasks.
pub struct Agent {
    llm: Arc<dyn ChatModel>,
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<Arc<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
}

/// Result of an agent working on one prompt.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// Final text answer
    pub content: String,

    /// Names of the tools called along the way, in order
    pub tool_calls_made: Vec<String>,

    /// Number of model calls made
    pub iterations: usize,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("model", &self.llm.model_name())
            .field("tools", &self.tool_names())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

impl Agent {
    /// Start building an agent backed by `llm`.
    pub fn builder(llm: Arc<dyn ChatModel>) -> AgentBuilder {
        AgentBuilder::new(llm)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn system_prompt(&self) -> String {
        let mut prompt = format!("You are {}.", self.role);
        if !self.backstory.is_empty() {
            prompt.push(' ');
            prompt.push_str(&self.backstory);
        }
        if !self.goal.is_empty() {
            prompt.push_str("\nYour personal goal is: ");
            prompt.push_str(&self.goal);
        }
        prompt
    }

    /// Work on a prompt until the model gives a final answer.
    ///
    /// Tool calls requested by the model are executed and fed back. Tool
    /// failures are reported to the model as text so it can recover; only
    /// model errors and the iteration limit abort the run.
    pub async fn execute(&self, prompt: &str) -> Result<AgentOutput> {
        let mut messages = vec![
            serde_json::json!({ "role": "system", "content": self.system_prompt() }),
            serde_json::json!({ "role": "user", "content": prompt }),
        ];
        let tool_specs: Vec<serde_json::Value> =
            self.tools.iter().map(|t| t.function_spec()).collect();

        let mut tool_calls_made = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                warn!(role = %self.role, max_iterations = self.max_iterations, "Agent reached max iterations");
                return Err(CrewError::MaxIterations {
                    role: self.role.clone(),
                    max: self.max_iterations,
                });
            }

            debug!(
                role = %self.role,
                iteration = iterations,
                message_count = messages.len(),
                "Agent iteration starting"
            );

            let request = ChatRequest::new(messages.clone())
                .tools(tool_specs.clone())
                .temperature(self.temperature);
            let reply = self.llm.complete(request).await?;

            if reply.tool_calls.is_empty() {
                let content = reply.content.unwrap_or_default();
                info!(
                    role = %self.role,
                    iterations,
                    tool_calls_total = tool_calls_made.len(),
                    response_len = content.len(),
                    "Agent finished"
                );
                return Ok(AgentOutput {
                    content,
                    tool_calls_made,
                    iterations,
                });
            }

            messages.push(reply.to_message());

            for call in &reply.tool_calls {
                info!(role = %self.role, tool = %call.name, id = %call.id, "Executing tool call");
                tool_calls_made.push(call.name.clone());

                let result = match self.tools.iter().find(|t| t.name() == call.name) {
                    Some(tool) => tool.invoke(call).await,
                    None => ToolResult::unknown(call),
                };
                if let Err(e) = &result.outcome {
                    warn!(role = %self.role, tool = %call.name, error = %e, "Tool call failed");
                }
                debug!(tool = %call.name, result_preview = %truncate_for_log(&result.content(), 200), "Tool result");

                messages.push(result.to_message());
            }
        }
    }
}

fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &s[..idx]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedModel, ScriptedReply};
    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, JsonSchema)]
    struct AddArgs {
        a: i32,
        b: i32,
    }

    #[derive(Serialize)]
    struct AddResult {
        sum: i32,
    }

    struct Calculator;

    #[async_trait]
    impl Tool for Calculator {
        const NAME: &'static str = "add";
        type Args = AddArgs;
        type Output = AddResult;
        type Error = std::convert::Infallible;

        fn description(&self) -> &str {
            "Add two numbers together"
        }

        async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
            Ok(AddResult { sum: args.a + args.b })
        }
    }

    fn agent(model: Arc<ScriptedModel>) -> Agent {
        Agent::builder(model)
            .role("Accountant")
            .goal("Add numbers")
            .backstory("You never guess.")
            .tool(Calculator)
            .max_iterations(3)
            .build()
    }

    #[tokio::test]
    async fn returns_text_answer_without_tools() {
        let model = Arc::new(ScriptedModel::replying("42"));
        let output = agent(model.clone()).execute("What is 40 + 2?").await.unwrap();

        assert_eq!(output.content, "42");
        assert_eq!(output.iterations, 1);
        assert!(output.tool_calls_made.is_empty());

        let requests = model.requests();
        let system = requests[0].messages[0]["content"].as_str().unwrap();
        assert!(system.starts_with("You are Accountant."));
        assert!(system.contains("Your personal goal is: Add numbers"));
        assert_eq!(requests[0].tools.len(), 1);
    }

    #[tokio::test]
    async fn executes_tool_calls_and_feeds_results_back() {
        let model = Arc::new(ScriptedModel::from_script(vec![
            ScriptedReply::tool_call("add", r#"{"a": 40, "b": 2}"#),
            ScriptedReply::text("The sum is 42"),
        ]));

        let output = agent(model.clone()).execute("Add 40 and 2").await.unwrap();

        assert_eq!(output.content, "The sum is 42");
        assert_eq!(output.tool_calls_made, vec!["add".to_string()]);
        assert_eq!(output.iterations, 2);

        let second = &model.requests()[1];
        let tool_message = second.messages.last().unwrap();
        assert_eq!(tool_message["role"], "tool");
        assert_eq!(tool_message["content"], r#"{"sum":42}"#);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_the_model() {
        let model = Arc::new(ScriptedModel::from_script(vec![
            ScriptedReply::tool_call("multiply", "{}"),
            ScriptedReply::text("done"),
        ]));

        agent(model.clone()).execute("Multiply").await.unwrap();

        let tool_message = model.requests()[1].messages.last().cloned().unwrap();
        assert_eq!(tool_message["content"], "Error: Unknown tool 'multiply'");
    }

    #[tokio::test]
    async fn invalid_arguments_are_reported_and_the_loop_continues() {
        let model = Arc::new(ScriptedModel::from_script(vec![
            ScriptedReply::tool_call("add", r#"{"a": "forty"}"#),
            ScriptedReply::text("gave up"),
        ]));

        let output = agent(model.clone()).execute("Add").await.unwrap();
        assert_eq!(output.content, "gave up");

        let history = &model.requests()[1].messages;
        let assistant = &history[history.len() - 2];
        assert_eq!(assistant["role"], "assistant");
        assert_eq!(assistant["tool_calls"][0]["function"]["name"], "add");
        assert_eq!(history.last().unwrap()["tool_call_id"], assistant["tool_calls"][0]["id"]);
        assert!(history.last().unwrap()["content"]
            .as_str()
            .unwrap()
            .starts_with("Error: Invalid arguments for 'add'"));
    }

    #[tokio::test]
    async fn stops_after_max_iterations() {
        let model = Arc::new(ScriptedModel::from_script(vec![
            ScriptedReply::tool_call("add", r#"{"a": 1, "b": 1}"#),
            ScriptedReply::tool_call("add", r#"{"a": 1, "b": 1}"#),
            ScriptedReply::tool_call("add", r#"{"a": 1, "b": 1}"#),
            ScriptedReply::text("never reached"),
        ]));

        let err = agent(model).execute("Loop forever").await.unwrap_err();
        assert!(matches!(err, CrewError::MaxIterations { max: 3, .. }));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let model = Arc::new(ScriptedModel::failing("quota exceeded"));
        let err = agent(model).execute("anything").await.unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_for_log("héllo", 10), "héllo");
        assert_eq!(truncate_for_log("héllo", 2), "hé...[truncated]");
    }
}
