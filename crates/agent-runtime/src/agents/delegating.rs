//! Delegating agent implementation (the model routes to sub-agents)

use crate::agents::llm::{LlmAgent, LlmAgentBuilder};
use agent_core::{Agent, Error, Result, RunContext};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// An agent whose model decides which sub-agents to call, and in what order
///
/// Every sub-agent is exposed to the coordinator's model as a tool taking a
/// `request` argument. The order of calls is whatever the model chooses; an
/// instruction can ask for an order but nothing enforces it.
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{DelegatingAgent, LlmAgent};
/// use agent_llm::LLMProvider;
/// use std::sync::Arc;
///
/// # fn example(provider: Arc<dyn LLMProvider>, research: Arc<LlmAgent>, summarize: Arc<LlmAgent>) -> agent_core::Result<()> {
/// let coordinator = DelegatingAgent::builder("ResearchCoordinator")
///     .provider(provider)
///     .instruction("First call ResearchAgent, then SummarizerAgent with its findings.")
///     .sub_agent(research)
///     .sub_agent(summarize)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DelegatingAgent {
    coordinator: LlmAgent,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl DelegatingAgent {
    /// Create a new builder for delegating agent
    pub fn builder(name: impl Into<String>) -> DelegatingAgentBuilder {
        DelegatingAgentBuilder::new(name)
    }

    /// Get the number of sub-agents
    pub fn agent_count(&self) -> usize {
        self.sub_agents.len()
    }

    /// Get the list of available agent names
    pub fn agent_names(&self) -> Vec<&str> {
        self.sub_agents.iter().map(|a| a.name()).collect()
    }
}

#[async_trait]
impl Agent for DelegatingAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        debug!(
            agent = %self.coordinator.name(),
            sub_agents = ?self.agent_names(),
            "Delegating run to coordinator model"
        );
        self.coordinator.run(ctx).await
    }

    fn name(&self) -> &str {
        self.coordinator.name()
    }

    fn description(&self) -> &str {
        self.coordinator.description()
    }

    fn output_slots(&self) -> Vec<String> {
        self.coordinator.output_slots()
    }
}

/// Builder for DelegatingAgent
pub struct DelegatingAgentBuilder {
    coordinator: LlmAgentBuilder,
    sub_agents: Vec<Arc<dyn Agent>>,
    name: String,
}

impl DelegatingAgentBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            coordinator: LlmAgentBuilder::new(name.clone()),
            sub_agents: Vec::new(),
            name,
        }
    }

    /// Start from a configured coordinator builder
    ///
    /// Used by [`AgentRuntime`](crate::AgentRuntime) to pass on its provider and defaults.
    pub fn from_coordinator(name: impl Into<String>, coordinator: LlmAgentBuilder) -> Self {
        Self {
            coordinator,
            sub_agents: Vec::new(),
            name: name.into(),
        }
    }

    /// Set the LLM provider of the coordinator
    pub fn provider(mut self, provider: Arc<dyn agent_llm::LLMProvider>) -> Self {
        self.coordinator = self.coordinator.provider(provider);
        self
    }

    /// Set the model of the coordinator
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.model(model);
        self
    }

    /// Set the coordinator's instruction template
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.instruction(instruction);
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.description(description);
        self
    }

    /// Write the coordinator's final text to this slot
    pub fn output_key(mut self, key: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.output_key(key);
        self
    }

    /// Add a sub-agent
    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Build the delegating agent
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when there are no sub-agents or two share a name.
    pub fn build(self) -> Result<DelegatingAgent> {
        if self.sub_agents.is_empty() {
            return Err(Error::Configuration(format!(
                "delegating agent '{}' has no sub-agents",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for agent in &self.sub_agents {
            if !seen.insert(agent.name()) {
                return Err(Error::Configuration(format!(
                    "delegating agent '{}' has two sub-agents named '{}'",
                    self.name,
                    agent.name()
                )));
            }
        }

        let coordinator = self
            .sub_agents
            .iter()
            .cloned()
            .fold(self.coordinator, |builder, agent| builder.agent_tool(agent))
            .build()?;

        Ok(DelegatingAgent {
            coordinator,
            sub_agents: self.sub_agents,
        })
    }
}
