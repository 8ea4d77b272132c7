//! Parallel composite

use agent_core::{Agent, ChildFailure, Error, EventKind, Result, RunContext};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs its children concurrently against the same blackboard
///
/// All children are started together and awaited together. Children must
/// write disjoint slots; [`ParallelAgentBuilder::build`] rejects trees where
/// two branches declare the same slot. Every child runs to completion even if
/// a sibling fails, and all failures are reported in one
/// [`Error::CompositeAggregate`].
///
/// The output joins the children's outputs in declaration order.
pub struct ParallelAgent {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
}

impl ParallelAgent {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> ParallelAgentBuilder {
        ParallelAgentBuilder::new(name)
    }

    /// Children in declaration order
    pub fn children(&self) -> &[Arc<dyn Agent>] {
        &self.children
    }
}

#[async_trait]
impl Agent for ParallelAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        ctx.ensure_active()?;
        ctx.emit(&self.name, EventKind::Started);
        info!(agent = %self.name, branches = self.children.len(), "Parallel run started");
        let started = Instant::now();

        let results = join_all(self.children.iter().map(|child| child.run(ctx))).await;

        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut outputs = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (child, result) in self.children.iter().zip(results) {
            match result {
                Ok(text) => outputs.push(text),
                Err(error) => {
                    warn!(agent = %self.name, child = %child.name(), error = %error, "Branch failed");
                    failures.push(ChildFailure {
                        child: child.name().to_string(),
                        error,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(Error::CompositeAggregate {
                composite: self.name.clone(),
                failures,
            });
        }

        info!(
            agent = %self.name,
            duration_ms = started.elapsed().as_millis() as u64,
            "All branches completed"
        );
        Ok(outputs.join("\n\n"))
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

/// Builder for ParallelAgent
pub struct ParallelAgentBuilder {
    name: String,
    description: String,
    children: Vec<Arc<dyn Agent>>,
}

impl ParallelAgentBuilder {
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

    /// Add a branch
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.children.push(agent);
        self
    }

    /// Build the composite
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when there are no children or two branches
    /// write the same slot.
    pub fn build(self) -> Result<ParallelAgent> {
        if self.children.is_empty() {
            return Err(Error::Configuration(format!(
                "parallel agent '{}' has no children",
                self.name
            )));
        }

        let mut owners: HashMap<String, &str> = HashMap::new();
        for child in &self.children {
            for slot in child.output_slots() {
                if let Some(owner) = owners.insert(slot.clone(), child.name()) {
                    return Err(Error::Configuration(format!(
                        "parallel agent '{}': branches '{}' and '{}' both write slot '{}'",
                        self.name,
                        owner,
                        child.name(),
                        slot
                    )));
                }
            }
        }

        Ok(ParallelAgent {
            name: self.name,
            description: self.description,
            children: self.children,
        })
    }
}
