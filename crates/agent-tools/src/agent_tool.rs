//! Agents exposed as tools
//!
//! Lets a model delegate a request to another agent. The wrapped agent runs on
//! the caller's blackboard with the request as its user input; its final text
//! becomes the tool result.

use crate::{Tool, ToolOutcome};
use agent_core::{Agent, Error, Result, RunContext};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Tool that invokes an agent
pub struct AgentTool {
    agent: Arc<dyn Agent>,
    description: String,
}

impl AgentTool {
    /// Wrap an agent; the tool takes the agent's name and description
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        let description = match agent.description() {
            "" => format!("Delegate a request to the {} agent.", agent.name()),
            text => text.to_string(),
        };
        Self { agent, description }
    }

    /// Override the description shown to the model
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The wrapped agent
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }
}

#[async_trait]
impl Tool for AgentTool {
    async fn execute(&self, params: Value, ctx: &RunContext) -> Result<Value> {
        let request = match params.get("request") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => {
                return Err(Error::tool(
                    self.agent.name(),
                    "missing required argument 'request'",
                ));
            }
        };

        debug!(agent = self.agent.name(), "Delegating request to agent tool");

        // An exit raised by the callee must not end the caller's loop
        let child = ctx.with_input(request).escalation_scope();
        let text = self.agent.run(&child).await?;

        Ok(ToolOutcome::success(json!({ "result": text })).into_value())
    }

    fn name(&self) -> &str {
        self.agent.name()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": "The request for the agent"
                }
            },
            "required": ["request"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    #[async_trait]
    impl Agent for Doubler {
        async fn run(&self, ctx: &RunContext) -> Result<String> {
            ctx.blackboard().set("last_request", ctx.input());
            ctx.escalate();
            Ok(format!("{0}{0}", ctx.input()))
        }

        fn name(&self) -> &str {
            "Doubler"
        }

        fn description(&self) -> &str {
            "Repeats the request twice"
        }
    }

    #[tokio::test]
    async fn test_runs_agent_with_request_as_input() {
        let tool = AgentTool::new(Arc::new(Doubler));
        let ctx = RunContext::new("outer");

        let result = tool.execute(json!({"request": "ab"}), &ctx).await.unwrap();

        assert_eq!(result, json!({"status": "success", "result": "abab"}));
        assert_eq!(ctx.blackboard().get_text("last_request").as_deref(), Some("ab"));
        assert_eq!(ctx.input(), "outer");
    }

    #[tokio::test]
    async fn test_callee_escalation_is_contained() {
        let tool = AgentTool::new(Arc::new(Doubler));
        let ctx = RunContext::new("outer");

        tool.execute(json!({"request": "x"}), &ctx).await.unwrap();
        assert!(!ctx.is_escalated());
    }

    #[tokio::test]
    async fn test_missing_request_is_recoverable() {
        let tool = AgentTool::new(Arc::new(Doubler));
        let err = tool
            .execute(json!({}), &RunContext::default())
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_metadata() {
        let tool = AgentTool::new(Arc::new(Doubler));
        assert_eq!(tool.name(), "Doubler");
        assert_eq!(tool.description(), "Repeats the request twice");
        assert_eq!(tool.input_schema()["required"], json!(["request"]));
    }
}
