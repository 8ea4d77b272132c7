//! Core Agent trait definition

use crate::{RunContext, Result};
use async_trait::async_trait;

/// Core trait that every node of an orchestration tree implements
///
/// Leaf agents wrap a capability invocation; composites drive their children.
/// Both read and write shared state only through the [`RunContext`]'s
/// blackboard, so no state survives between two `run` calls except what was
/// written there.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the node to completion and return its text
    async fn run(&self, ctx: &RunContext) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;

    /// Short description, shown to a parent model when this agent is used as a tool
    fn description(&self) -> &str {
        ""
    }

    /// Blackboard slots this node (or any node below it) writes
    ///
    /// Parallel composites use this to reject children that would race on
    /// the same slot.
    fn output_slots(&self) -> Vec<String> {
        Vec::new()
    }
}
