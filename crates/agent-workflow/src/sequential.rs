//! Sequential composite

use agent_core::{Agent, Error, EventKind, Result, RunContext};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs its children strictly in declaration order
///
/// Each child finishes, side effects included, before the next starts. The
/// first failure aborts the remaining children and is returned unchanged.
/// The output is the output of the last child.
///
/// # Example
///
/// ```no_run
/// use agent_workflow::SequentialAgent;
/// use agent_core::Agent;
/// use std::sync::Arc;
///
/// # fn example(outline: Arc<dyn Agent>, writer: Arc<dyn Agent>, editor: Arc<dyn Agent>) -> agent_core::Result<()> {
/// let pipeline = SequentialAgent::builder("BlogPipeline")
///     .agent(outline)
///     .agent(writer)
///     .agent(editor)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SequentialAgent {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
}

impl SequentialAgent {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> SequentialAgentBuilder {
        SequentialAgentBuilder::new(name)
    }

    /// Children in execution order
    pub fn children(&self) -> &[Arc<dyn Agent>] {
        &self.children
    }
}

#[async_trait]
impl Agent for SequentialAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        ctx.ensure_active()?;
        ctx.emit(&self.name, EventKind::Started);
        info!(agent = %self.name, steps = self.children.len(), "Sequential run started");

        let mut output = String::new();
        for (index, child) in self.children.iter().enumerate() {
            ctx.ensure_active()?;
            debug!(agent = %self.name, step = index + 1, child = %child.name(), "Running step");

            output = child.run(ctx).await.inspect_err(|e| {
                warn!(agent = %self.name, child = %child.name(), error = %e, "Step failed, aborting");
            })?;
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn output_slots(&self) -> Vec<String> {
        self.children.iter().flat_map(|c| c.output_slots()).collect()
    }
}

/// Builder for SequentialAgent
pub struct SequentialAgentBuilder {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
}

impl SequentialAgentBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a child
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.children.push(agent);
        self
    }

    /// Build the composite
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when there are no children.
    pub fn build(self) -> Result<SequentialAgent> {
        if self.children.is_empty() {
            return Err(Error::Configuration(format!(
                "sequential agent '{}' has no children",
                self.name
            )));
        }
        Ok(SequentialAgent {
            name: self.name,
            description: self.description,
            children: self.children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Journal, StepAgent};
    use mockall::mock;

    mock! {
        Child {}

        #[async_trait]
        impl Agent for Child {
            async fn run(&self, ctx: &RunContext) -> Result<String>;
            fn name(&self) -> &str;
        }
    }

    #[tokio::test]
    async fn test_children_run_in_order() {
        let journal = Journal::default();
        // The first child is the slowest; order must still be declaration order
        let pipeline = SequentialAgent::builder("BlogPipeline")
            .agent(StepAgent::new("OutlineAgent", &journal).slot("blog_outline").delay_ms(20).shared())
            .agent(StepAgent::new("WriterAgent", &journal).slot("blog_draft").delay_ms(5).shared())
            .agent(StepAgent::new("EditorAgent", &journal).slot("final_blog").shared())
            .build()
            .unwrap();
        let ctx = RunContext::new("topic");

        let output = pipeline.run(&ctx).await.unwrap();

        assert_eq!(output, "EditorAgent#1");
        assert_eq!(
            journal.entries(),
            vec!["OutlineAgent#1", "WriterAgent#1", "EditorAgent#1"]
        );
        for slot in ["blog_outline", "blog_draft", "final_blog"] {
            assert!(ctx.blackboard().contains_key(slot));
        }
        assert_eq!(
            pipeline.output_slots(),
            vec!["blog_outline", "blog_draft", "final_blog"]
        );
    }

    #[tokio::test]
    async fn test_first_failure_aborts_remaining_children() {
        let journal = Journal::default();

        let mut never_run = MockChild::new();
        never_run.expect_run().times(0);
        never_run.expect_name().return_const("Never".to_string());

        let pipeline = SequentialAgent::builder("Pipeline")
            .agent(StepAgent::new("First", &journal).slot("a").shared())
            .agent(StepAgent::new("Broken", &journal).failing().shared())
            .agent(Arc::new(never_run))
            .build()
            .unwrap();
        let ctx = RunContext::new("");

        let err = pipeline.run(&ctx).await.unwrap_err();

        assert!(matches!(err, Error::CapabilityFailed(ref m) if m == "Broken broke"));
        assert_eq!(journal.entries(), vec!["First#1", "Broken#1"]);
        assert!(ctx.blackboard().contains_key("a"));
    }

    #[tokio::test]
    async fn test_cancellation_between_steps() {
        let journal = Journal::default();
        let pipeline = SequentialAgent::builder("Pipeline")
            .agent(StepAgent::new("Only", &journal).shared())
            .build()
            .unwrap();
        let ctx = RunContext::new("");
        ctx.cancellation().cancel();

        let err = pipeline.run(&ctx).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert!(matches!(
            SequentialAgent::builder("Empty").build(),
            Err(Error::Configuration(_))
        ));
    }
}
