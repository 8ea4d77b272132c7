//! Shared provider and defaults for building agents
//!
//! Pattern builders never touch the provider directly: they ask the runtime
//! for an agent builder that already carries it.

use agent_core::{Error, Result};
use agent_llm::LLMProvider;
use agent_utils::Config;
use std::sync::Arc;

use crate::agents::{DelegatingAgentBuilder, LlmAgentBuilder};
use crate::executor::ExecutorConfig;

/// Defaults applied to every agent the runtime builds
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Tool-call rounds allowed in one agent turn
    pub default_max_tool_rounds: usize,

    pub default_model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_max_tool_rounds: 10,
            default_model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }
}

impl From<&Config> for RuntimeConfig {
    fn from(config: &Config) -> Self {
        Self {
            default_max_tool_rounds: config.max_tool_rounds,
            default_model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        }
    }
}

impl RuntimeConfig {
    /// Executor settings derived from the defaults
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_tool_rounds: self.default_max_tool_rounds,
            model: self.default_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Factory for agents sharing one capability backend
///
/// # Example
///
/// ```no_run
/// use agent_runtime::AgentRuntime;
/// use agent_llm::LLMProvider;
/// use std::sync::Arc;
///
/// # fn example(provider: Arc<dyn LLMProvider>) -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder()
///     .provider(provider)
///     .default_model("claude-sonnet-4-5-20250929")
///     .build()?;
///
/// let assistant = runtime
///     .agent("helpful_assistant")
///     .instruction("You are a helpful assistant.")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    pub fn new(provider: Arc<dyn LLMProvider>, config: RuntimeConfig) -> Self {
        Self { provider, config }
    }

    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Builder for an LLM agent using the runtime's provider and defaults
    pub fn agent(&self, name: impl Into<String>) -> LlmAgentBuilder {
        LlmAgentBuilder::new(name)
            .provider(self.provider.clone())
            .config(self.config.executor_config())
    }

    /// Builder for a delegating agent using the runtime's provider and defaults
    pub fn delegating(&self, name: impl Into<String>) -> DelegatingAgentBuilder {
        let name = name.into();
        DelegatingAgentBuilder::from_coordinator(name.clone(), self.agent(name))
    }
}

/// Builder for [`AgentRuntime`]; a provider is required
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace all defaults at once
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn default_max_tool_rounds(mut self, max: usize) -> Self {
        self.config.default_max_tool_rounds = max;
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    /// # Errors
    ///
    /// [`Error::InitializationFailed`] without a provider
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentRuntime::new(provider, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
