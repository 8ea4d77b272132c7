//! Capability-backed agent node

use crate::executor::{AgentExecutor, ExecutorConfig};
use agent_core::{Agent, Error, EventKind, Result, RunContext};
use agent_llm::LLMProvider;
use agent_tools::{AgentTool, CodeExecutor, Tool, ToolRegistry, extract_code_blocks};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// An agent that answers through the LLM capability
///
/// Each run renders the instruction template against the blackboard, runs
/// one executor turn with the agent's tools, optionally executes the code
/// blocks of the answer, and writes the final text to the output slot.
///
/// # Example
///
/// ```no_run
/// use agent_runtime::LlmAgent;
/// use agent_llm::LLMProvider;
/// use std::sync::Arc;
///
/// # fn example(provider: Arc<dyn LLMProvider>) -> agent_core::Result<()> {
/// let writer = LlmAgent::builder("WriterAgent")
///     .provider(provider)
///     .instruction("Following this outline strictly: {blog_outline}\nWrite a short blog post.")
///     .output_key("blog_draft")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct LlmAgent {
    name: String,
    description: String,
    instruction: String,
    executor: AgentExecutor,
    output_key: Option<String>,
    code_executor: Option<Arc<dyn CodeExecutor>>,
    nested_slots: Vec<String>,
}

impl LlmAgent {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> LlmAgentBuilder {
        LlmAgentBuilder::new(name)
    }

    /// Instruction template, before rendering
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Slot the final text is written to
    pub fn output_key(&self) -> Option<&str> {
        self.output_key.as_deref()
    }

    /// Tools available to the model
    pub fn tools(&self) -> &ToolRegistry {
        self.executor.tools()
    }

    /// Execute the code blocks of `text`, appending what they printed
    async fn run_code_blocks(
        &self,
        executor: &dyn CodeExecutor,
        text: String,
        ctx: &RunContext,
    ) -> Result<String> {
        let blocks = extract_code_blocks(&text);
        if blocks.is_empty() {
            return Ok(text);
        }

        let mut output = text;
        for (index, block) in blocks.iter().enumerate() {
            info!(agent = %self.name, block = index + 1, "Executing generated code");
            let result = tokio::select! {
                biased;
                _ = ctx.cancellation().cancelled() => return Err(Error::Cancelled),
                result = executor.execute(block) => result,
            };
            match result {
                Ok(run) if run.succeeded() => {
                    output.push_str("\n\nCode execution result:\n");
                    output.push_str(run.stdout.trim_end());
                }
                Ok(run) => {
                    warn!(agent = %self.name, exit_code = ?run.exit_code, "Generated code failed");
                    output.push_str("\n\nCode execution failed:\n");
                    output.push_str(run.stderr.trim_end());
                }
                Err(e) if e.is_recoverable() => {
                    warn!(agent = %self.name, error = %e, "Code executor unavailable");
                    output.push_str(&format!("\n\nCode execution error: {e}"));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(output)
    }
}

#[async_trait]
impl Agent for LlmAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        ctx.ensure_active()?;
        ctx.emit(&self.name, EventKind::Started);
        info!(agent = %self.name, "Agent started");

        let instruction = ctx.blackboard().render(&self.instruction)?;
        let turn = self.executor.run(&self.name, &instruction, ctx).await?;

        if turn.escalated {
            ctx.emit(&self.name, EventKind::Escalate);
            info!(agent = %self.name, "Agent escalated, output slot left unchanged");
            return Ok(turn.text);
        }

        let text = match &self.code_executor {
            Some(executor) => {
                self.run_code_blocks(executor.as_ref(), turn.text, ctx)
                    .await?
            }
            None => turn.text,
        };

        ctx.emit(
            &self.name,
            EventKind::Text {
                content: text.clone(),
            },
        );

        if let Some(key) = &self.output_key {
            ctx.blackboard().set(key.clone(), text.clone());
            ctx.emit(
                &self.name,
                EventKind::StateUpdate {
                    key: key.clone(),
                    value: Value::String(text.clone()),
                },
            );
        }

        info!(
            agent = %self.name,
            tool_rounds = turn.tool_rounds,
            response_length = text.len(),
            "Agent completed"
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn output_slots(&self) -> Vec<String> {
        self.output_key
            .iter()
            .cloned()
            .chain(self.nested_slots.iter().cloned())
            .collect()
    }
}

/// Builder for LlmAgent
pub struct LlmAgentBuilder {
    name: String,
    description: String,
    instruction: String,
    provider: Option<Arc<dyn LLMProvider>>,
    config: ExecutorConfig,
    tools: ToolRegistry,
    output_key: Option<String>,
    code_executor: Option<Arc<dyn CodeExecutor>>,
    nested_slots: Vec<String>,
    duplicate_tool: Option<String>,
}

impl LlmAgentBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            instruction: String::new(),
            provider: None,
            config: ExecutorConfig::default(),
            tools: ToolRegistry::new(),
            output_key: None,
            code_executor: None,
            nested_slots: Vec::new(),
            duplicate_tool: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the executor configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set maximum tool rounds per turn
    pub fn max_tool_rounds(mut self, max: usize) -> Self {
        self.config.max_tool_rounds = max;
        self
    }

    /// Set the description shown to a parent model
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the instruction template
    ///
    /// `{key}` placeholders are filled from the blackboard before each run;
    /// `{key?}` renders as empty text when the key is missing.
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Add a tool; names must be unique within the agent
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        if self.duplicate_tool.is_none() && self.tools.get(tool.name()).is_some() {
            self.duplicate_tool = Some(tool.name().to_string());
        }
        self.tools.register(tool);
        self
    }

    /// Expose another agent as a tool
    pub fn agent_tool(mut self, agent: Arc<dyn Agent>) -> Self {
        self.nested_slots.extend(agent.output_slots());
        self.tool(Arc::new(AgentTool::new(agent)))
    }

    /// Write the final text to this blackboard slot; a blank key means no write
    pub fn output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }

    /// Execute code blocks found in the final answer
    pub fn code_executor(mut self, executor: Arc<dyn CodeExecutor>) -> Self {
        self.code_executor = Some(executor);
        self
    }

    /// Build the agent
    ///
    /// # Errors
    ///
    /// - [`Error::InitializationFailed`] when no provider was set
    /// - [`Error::Configuration`] when the name is blank or two tools share a name
    pub fn build(self) -> Result<LlmAgent> {
        if self.name.trim().is_empty() {
            return Err(Error::Configuration("agent name must not be empty".to_string()));
        }
        if let Some(tool) = &self.duplicate_tool {
            return Err(Error::Configuration(format!(
                "agent '{}' registers tool '{tool}' more than once",
                self.name
            )));
        }
        let output_key = self.output_key.filter(|key| !key.trim().is_empty());
        let provider = self.provider.ok_or_else(|| {
            Error::InitializationFailed(format!("Provider not set for agent '{}'", self.name))
        })?;

        Ok(LlmAgent {
            name: self.name,
            description: self.description,
            instruction: self.instruction,
            executor: AgentExecutor::new(provider, self.tools, self.config),
            output_key,
            code_executor: self.code_executor,
            nested_slots: self.nested_slots,
        })
    }
}
