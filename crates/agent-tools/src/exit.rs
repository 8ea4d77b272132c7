//! Loop exit tool

use crate::{Tool, ToolOutcome};
use agent_core::{Result, RunContext};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

/// Name the exit tool is registered under
pub const EXIT_LOOP_TOOL: &str = "exit_loop";

/// Raises the exit signal for the enclosing loop
///
/// The calling agent's turn ends right after this tool runs, and the loop
/// stops once the current pass has finished.
#[derive(Debug, Clone)]
pub struct ExitLoopTool {
    description: String,
    message: String,
}

impl Default for ExitLoopTool {
    fn default() -> Self {
        Self {
            description: "Call this function ONLY when the work is approved and no further \
                          refinement is needed. Ends the refinement loop."
                .to_string(),
            message: "Exiting loop.".to_string(),
        }
    }
}

impl ExitLoopTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description shown to the model
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Message returned to the model on exit
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[async_trait]
impl Tool for ExitLoopTool {
    async fn execute(&self, _params: Value, ctx: &RunContext) -> Result<Value> {
        info!("Loop exit requested");
        ctx.escalate();
        Ok(ToolOutcome::success(json!({ "message": self.message })).into_value())
    }

    fn name(&self) -> &str {
        EXIT_LOOP_TOOL
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_raises_signal() {
        let tool = ExitLoopTool::new().with_message("Story approved. Exiting refinement loop.");
        let ctx = RunContext::new("");

        let result = tool.execute(json!({}), &ctx).await.unwrap();

        assert!(ctx.is_escalated());
        assert_eq!(result["status"], "success");
        assert_eq!(result["message"], "Story approved. Exiting refinement loop.");
        assert_eq!(tool.name(), "exit_loop");
    }
}
