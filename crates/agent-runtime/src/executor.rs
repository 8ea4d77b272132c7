//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the capability loop of one agent turn:
//! 1. Call the LLM with the rendered instruction, the transcript and the tools
//! 2. If the model asked for tools, execute them in order and feed the results back
//! 3. Repeat until the model answers with text, a tool raises the exit signal,
//!    or the round bound is reached

use agent_core::{Error, EventKind, Result, RunContext};
use agent_llm::{
    CompletionRequest, ContentBlock, LLMError, LLMProvider, Message, StopReason, ToolCall,
    ToolDefinition,
};
use agent_tools::{Tool, ToolOutcome, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// User turn sent when the run has no user input
const EMPTY_INPUT_PROMPT: &str = "Proceed with your instructions.";

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of tool-call rounds per turn (prevents infinite loops)
    pub max_tool_rounds: usize,

    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }
}

/// Result of one agent turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Final text of the turn (the last assistant text when the turn ended early)
    pub text: String,

    /// Whether a tool raised the loop exit signal during the turn
    pub escalated: bool,

    /// Number of tool-call rounds performed
    pub tool_rounds: usize,
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
///
/// The AgentExecutor orchestrates the interaction between an LLM provider
/// and a tool registry. Only [`Error::ToolExecution`] raised by a tool is
/// handed back to the model; every other error ends the turn.
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(provider: Arc<dyn LLMProvider>, tools: ToolRegistry, config: ExecutorConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create a new builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Tools available to the model
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Execution settings
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run one turn for `author` with `instruction` as the system prompt
    ///
    /// The run's user input is the opening user message. Tools execute
    /// sequentially in the order the model requested them.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityExhausted`] when transient backend failures outlast the retry budget
    /// - [`Error::CapabilityFailed`] for any other backend failure
    /// - [`Error::Cancelled`] when the run's cancellation token fires
    /// - any non-recoverable error raised by a tool
    pub async fn run(&self, author: &str, instruction: &str, ctx: &RunContext) -> Result<Turn> {
        let input = match ctx.input().trim() {
            "" => EMPTY_INPUT_PROMPT,
            _ => ctx.input(),
        };
        let mut conversation = vec![Message::user(input)];
        let tools = self.build_tool_definitions();

        // Exit signals raised during this turn are collected here and
        // forwarded to the caller's scope once the turn is over.
        let turn_ctx = ctx.escalation_scope();
        let mut last_text = String::new();
        let mut rounds = 0;

        loop {
            ctx.ensure_active()?;

            info!(
                agent = %author,
                model = %self.config.model,
                round = rounds,
                tool_count = tools.len(),
                "Sending request to LLM"
            );

            let mut request_builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .max_tokens(self.config.max_tokens);
            if !instruction.is_empty() {
                request_builder = request_builder.system(instruction);
            }
            if let Some(temperature) = self.config.temperature {
                request_builder = request_builder.temperature(temperature);
            }
            if !tools.is_empty() {
                request_builder = request_builder.tools(tools.clone());
            }
            let request = request_builder.build();

            let response = tokio::select! {
                biased;
                _ = ctx.cancellation().cancelled() => return Err(Error::Cancelled),
                result = self.provider.complete(request) => result.map_err(capability_error)?,
            };

            info!(
                agent = %author,
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            let text = response.message.joined_text();
            if !text.is_empty() {
                last_text = text;
            }

            if !response.message.has_tool_calls() {
                if response.stop_reason == StopReason::MaxTokens {
                    warn!(agent = %author, "Hit max tokens in LLM response");
                }
                debug!(agent = %author, rounds, response_length = last_text.len(), "Turn completed");
                return Ok(Turn {
                    text: last_text,
                    escalated: false,
                    tool_rounds: rounds,
                });
            }

            if rounds >= self.config.max_tool_rounds {
                warn!(
                    agent = %author,
                    max_tool_rounds = self.config.max_tool_rounds,
                    "Max tool rounds reached, ending turn"
                );
                return Ok(Turn {
                    text: last_text,
                    escalated: false,
                    tool_rounds: rounds,
                });
            }
            rounds += 1;

            conversation.push(response.message.clone());
            let results = self.execute_tools(author, &response.message, &turn_ctx).await?;
            conversation.push(results);

            if turn_ctx.is_escalated() {
                info!(agent = %author, "Exit signal raised, ending turn");
                ctx.escalate();
                return Ok(Turn {
                    text: last_text,
                    escalated: true,
                    tool_rounds: rounds,
                });
            }
        }
    }

    /// Build tool definitions from the registry
    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute the tool calls of an assistant message, answering all of them in one user message
    async fn execute_tools(
        &self,
        author: &str,
        message: &Message,
        ctx: &RunContext,
    ) -> Result<Message> {
        let mut blocks = Vec::new();

        for ToolCall { id, name, input } in message.tool_calls() {
            let input_preview: String = input.to_string().chars().take(500).collect();
            info!(
                agent = %author,
                tool_name = %name,
                tool_id = %id,
                input_preview = %input_preview,
                "Executing tool"
            );
            ctx.emit(
                author,
                EventKind::ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    input: input.clone(),
                },
            );

            let start_time = Instant::now();
            let (content, is_error) = match self.tools.get(name) {
                Some(tool) => self.invoke(tool.as_ref(), input.clone(), ctx).await?,
                None => {
                    warn!(agent = %author, tool_name = %name, "Model requested an unknown tool");
                    (format!("Error: Tool not found: {name}"), true)
                }
            };
            let duration_ms = start_time.elapsed().as_millis() as u64;

            if is_error {
                warn!(agent = %author, tool_name = %name, duration_ms, "Tool reported an error");
            } else {
                info!(
                    agent = %author,
                    tool_name = %name,
                    duration_ms,
                    result_length = content.len(),
                    "Tool execution succeeded"
                );
            }
            ctx.emit(
                author,
                EventKind::ToolResult {
                    id: id.to_string(),
                    name: name.to_string(),
                    content: content.clone(),
                    is_error,
                },
            );

            blocks.push(ContentBlock::tool_result(id, content, is_error));
        }

        Ok(Message::tool_results(blocks))
    }

    /// Run one tool, returning the content for the model and whether it is an error
    async fn invoke(&self, tool: &dyn Tool, input: Value, ctx: &RunContext) -> Result<(String, bool)> {
        let result = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => return Err(Error::Cancelled),
            result = tool.execute(input, ctx) => result,
        };

        match result {
            Ok(value) => {
                let is_error = ToolOutcome::from_value(&value).is_some_and(|o| o.is_error());
                Ok((value.to_string(), is_error))
            }
            Err(e) if e.is_recoverable() => Ok((format!("Error: {e}"), true)),
            Err(e) => Err(e),
        }
    }
}

/// Map a capability failure onto the run's error taxonomy
pub(crate) fn capability_error(error: LLMError) -> Error {
    match error {
        LLMError::RetriesExhausted { attempts, last } => Error::CapabilityExhausted {
            attempts,
            message: last.to_string(),
        },
        other => Error::CapabilityFailed(other.to_string()),
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Add one tool
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum tool rounds
    pub fn max_tool_rounds(mut self, max: usize) -> Self {
        self.config.max_tool_rounds = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentExecutor::new(provider, self.tools, self.config))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{CancellationToken, Event};
    use agent_llm::{CompletionResponse, MessageContent};
    use agent_llm::mock::ScriptedProvider;
    use agent_tools::{ExitLoopTool, FunctionTool};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn fee_tool() -> Arc<dyn Tool> {
        Arc::new(FunctionTool::new(
            "get_fee",
            "Look up a fee",
            json!({"type": "object"}),
            |args| match args["method"].as_str() {
                Some("bank transfer") => ToolOutcome::success(json!({"fee_percentage": 0.01})),
                _ => ToolOutcome::error("Payment method not found"),
            },
        ))
    }

    fn executor(provider: Arc<ScriptedProvider>, tools: Vec<Arc<dyn Tool>>) -> AgentExecutor {
        tools
            .into_iter()
            .fold(AgentExecutor::builder().provider(provider), |b, t| b.tool(t))
            .model("test-model")
            .build()
            .unwrap()
    }

    /// Calls `tool` with `input` on the first request, then answers with the tool result
    fn call_once(tool: &'static str, input: serde_json::Value) -> ScriptedProvider {
        ScriptedProvider::new(move |request| {
            if request.messages.len() == 1 {
                Ok(CompletionResponse::tool_use("call_1", tool, input.clone()))
            } else {
                let last = request.messages.last().and_then(|m| m.tool_result_content());
                Ok(CompletionResponse::text(format!("saw {}", last.unwrap_or("nothing"))))
            }
        })
    }

    #[test]
    fn test_builder() {
        let builder = AgentExecutorBuilder::new()
            .model("test-model")
            .max_tool_rounds(5)
            .temperature(0.1);

        assert_eq!(builder.config.model, "test-model");
        assert_eq!(builder.config.max_tool_rounds, 5);
        assert_eq!(builder.config.temperature, Some(0.1));
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_tool_rounds, 10);
        assert_eq!(config.model, "claude-sonnet-4-5-20250929");
    }

    #[tokio::test]
    async fn test_plain_answer_uses_instruction_and_input() {
        let provider = Arc::new(ScriptedProvider::new(|_| Ok(CompletionResponse::text("hello"))));
        let exec = executor(provider.clone(), vec![]);

        let turn = exec
            .run("assistant", "Be brief.", &RunContext::new("hi"))
            .await
            .unwrap();

        assert_eq!(turn.text, "hello");
        assert_eq!(turn.tool_rounds, 0);
        let request = &provider.requests()[0];
        assert_eq!(request.system.as_deref(), Some("Be brief."));
        assert_eq!(request.messages[0].text(), Some("hi"));
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn test_tool_round_feeds_result_back() {
        let provider = Arc::new(call_once("get_fee", json!({"method": "bank transfer"})));
        let exec = executor(provider.clone(), vec![fee_tool()]);
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        let ctx = RunContext::new("fee?").with_event_sender(tx);

        let turn = exec.run("currency_agent", "", &ctx).await.unwrap();

        assert_eq!(turn.tool_rounds, 1);
        assert!(turn.text.contains("\"fee_percentage\":0.01"));
        assert_eq!(provider.request_count(), 2);

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.kind, EventKind::ToolCall { ref name, .. } if name == "get_fee"));
        let second = rx.recv().await.unwrap();
        assert!(matches!(second.kind, EventKind::ToolResult { is_error: false, .. }));
        assert_eq!(second.author, "currency_agent");
    }

    #[tokio::test]
    async fn test_error_outcome_is_flagged() {
        let provider = Arc::new(call_once("get_fee", json!({"method": "cash"})));
        let exec = executor(provider.clone(), vec![fee_tool()]);

        exec.run("a", "", &RunContext::new("x")).await.unwrap();

        let request = &provider.requests()[1];
        let Some(MessageContent::Blocks(blocks)) = &request.messages[2].content else {
            panic!("expected tool result blocks");
        };
        assert!(matches!(
            &blocks[0],
            ContentBlock::ToolResult { is_error: Some(true), content, .. }
                if content.contains("Payment method not found")
        ));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fed_back() {
        let provider = Arc::new(call_once("made_up_tool", json!({})));
        let exec = executor(provider.clone(), vec![fee_tool()]);

        let turn = exec.run("a", "", &RunContext::new("x")).await.unwrap();

        assert!(turn.text.contains("Tool not found: made_up_tool"));
    }

    #[tokio::test]
    async fn test_recoverable_tool_error_is_fed_back() {
        let failing: Arc<dyn Tool> = Arc::new(FunctionTool::new_async(
            "lookup",
            "Fails",
            json!({}),
            |_| async { Err(Error::tool("lookup", "service unavailable")) },
        ));
        let provider = Arc::new(call_once("lookup", json!({})));
        let exec = executor(provider, vec![failing]);

        let turn = exec.run("a", "", &RunContext::new("x")).await.unwrap();

        assert!(turn.text.contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_terminal_tool_error_propagates() {
        let failing: Arc<dyn Tool> = Arc::new(FunctionTool::new_async(
            "lookup",
            "Fails",
            json!({}),
            |_| async {
                Err(Error::CapabilityExhausted {
                    attempts: 5,
                    message: "503".to_string(),
                })
            },
        ));
        let provider = Arc::new(call_once("lookup", json!({})));
        let exec = executor(provider.clone(), vec![failing]);

        let err = exec.run("a", "", &RunContext::new("x")).await.unwrap_err();

        assert!(matches!(err, Error::CapabilityExhausted { attempts: 5, .. }));
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_exit_tool_ends_turn_and_escalates() {
        let provider = Arc::new(ScriptedProvider::new(|_| {
            Ok(CompletionResponse::tool_use("c1", "exit_loop", json!({})))
        }));
        let exec = executor(provider.clone(), vec![Arc::new(ExitLoopTool::new())]);
        let ctx = RunContext::new("x");

        let turn = exec.run("RefinerAgent", "", &ctx).await.unwrap();

        assert!(turn.escalated);
        assert!(ctx.is_escalated());
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_max_tool_rounds_bound() {
        let provider = Arc::new(ScriptedProvider::new(|_| {
            Ok(CompletionResponse::tool_use("c", "get_fee", json!({"method": "cash"})))
        }));
        let exec = AgentExecutor::builder()
            .provider(provider.clone())
            .tool(fee_tool())
            .max_tool_rounds(2)
            .build()
            .unwrap();

        let turn = exec.run("a", "", &RunContext::new("x")).await.unwrap();

        assert_eq!(turn.tool_rounds, 2);
        assert!(!turn.escalated);
        assert_eq!(provider.request_count(), 3);
    }

    #[tokio::test]
    async fn test_capability_errors_are_mapped() {
        let exhausted = Arc::new(ScriptedProvider::new(|_| {
            Err(LLMError::RetriesExhausted {
                attempts: 5,
                last: Box::new(LLMError::ServerError {
                    status: 503,
                    message: "overloaded".to_string(),
                }),
            })
        }));
        let err = executor(exhausted, vec![])
            .run("a", "", &RunContext::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityExhausted { attempts: 5, .. }));

        let invalid = Arc::new(ScriptedProvider::new(|_| {
            Err(LLMError::InvalidRequest("bad".to_string()))
        }));
        let err = executor(invalid, vec![])
            .run("a", "", &RunContext::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityFailed(_)));
    }

    #[tokio::test]
    async fn test_cancelled_run_stops_before_calling_provider() {
        let provider = Arc::new(ScriptedProvider::new(|_| Ok(CompletionResponse::text("x"))));
        let exec = executor(provider.clone(), vec![]);
        let token = CancellationToken::new();
        token.cancel();

        let err = exec
            .run("a", "", &RunContext::new("x").with_cancellation(token))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(provider.request_count(), 0);
    }
}
