//! Loop composite

use agent_core::{Agent, Error, EventKind, Result, RunContext};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Repeats its children, in order, up to `max_iterations` full passes
///
/// The loop ends early when a child raises the exit signal (see
/// `agent_tools::ExitLoopTool`); the signal is checked after each full pass.
/// Running out of iterations is a normal outcome: the blackboard keeps
/// whatever the last pass wrote. Each pass gets its own exit scope, so an
/// inner loop's exit never ends an outer one.
///
/// The output is the output of the last child run.
pub struct LoopAgent {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
    max_iterations: usize,
}

impl LoopAgent {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> LoopAgentBuilder {
        LoopAgentBuilder::new(name)
    }

    /// Upper bound on full passes
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

#[async_trait]
impl Agent for LoopAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        ctx.ensure_active()?;
        ctx.emit(&self.name, EventKind::Started);

        let mut output = String::new();
        for iteration in 1..=self.max_iterations {
            ctx.ensure_active()?;
            ctx.emit(&self.name, EventKind::Iteration { iteration });
            info!(
                agent = %self.name,
                iteration,
                max_iterations = self.max_iterations,
                "Loop pass started"
            );

            let pass = ctx.escalation_scope();
            for child in &self.children {
                ctx.ensure_active()?;
                output = child.run(&pass).await?;
            }

            if pass.is_escalated() {
                info!(agent = %self.name, iteration, "Exit signal received, leaving loop");
                return Ok(output);
            }
        }

        debug!(
            agent = %self.name,
            max_iterations = self.max_iterations,
            "Iteration bound reached"
        );
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

/// Builder for LoopAgent
pub struct LoopAgentBuilder {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
    max_iterations: usize,
}

impl LoopAgentBuilder {
    /// Create a new builder; the bound defaults to 10 passes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            children: Vec::new(),
            max_iterations: 10,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a child to each pass
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.children.push(agent);
        self
    }

    /// Set the bound on full passes
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Build the composite
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when there are no children or the bound is zero.
    pub fn build(self) -> Result<LoopAgent> {
        if self.children.is_empty() {
            return Err(Error::Configuration(format!(
                "loop agent '{}' has no children",
                self.name
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration(format!(
                "loop agent '{}' needs at least one iteration",
                self.name
            )));
        }
        Ok(LoopAgent {
            name: self.name,
            description: self.description,
            children: self.children,
            max_iterations: self.max_iterations,
        })
    }
}
