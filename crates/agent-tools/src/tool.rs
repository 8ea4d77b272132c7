//! Tool trait definition

use agent_core::{Result, RunContext};
use async_trait::async_trait;
use serde_json::Value;

/// A capability the model can invoke by name
///
/// Tools are what the model calls during an agent's turn: plain functions,
/// other agents, the loop exit signal, a code runner. Results are JSON values;
/// by convention they are [`ToolOutcome`](crate::ToolOutcome)s carrying a
/// `status` of `success` or `error` so the calling model can branch on it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool on the model-supplied `params` within the caller's run
    ///
    /// # Errors
    ///
    /// [`Error::ToolExecution`](agent_core::Error::ToolExecution) is reported
    /// back to the model; any other error aborts the calling agent.
    async fn execute(&self, params: Value, ctx: &RunContext) -> Result<Value>;

    /// Name the model calls the tool by; unique within an agent's toolset
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of `params`
    fn input_schema(&self) -> Value;
}
