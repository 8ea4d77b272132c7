//! One round trip to the capability backend

use crate::{ContentBlock, Message, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an agent sends for one model call
///
/// `system` carries the rendered instruction; `messages` the user turn plus
/// the tool-call rounds of the current agent turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub messages: Vec<Message>,

    pub max_tokens: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tools the model may call; empty means none are offered
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl CompletionRequest {
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }

    /// Names of the offered tools
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Builder for [`CompletionRequest`]
#[derive(Debug, Clone)]
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            request: CompletionRequest {
                model: model.into(),
                system: None,
                messages: Vec::new(),
                max_tokens: 4096,
                temperature: None,
                tools: Vec::new(),
            },
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Replace the transcript
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    /// Append one message to the transcript
    pub fn message(mut self, message: Message) -> Self {
        self.request.messages.push(message);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.temperature = Some(temperature);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = tools;
        self
    }

    pub fn build(self) -> CompletionRequest {
        self.request
    }
}

/// Why the model stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    /// The message asks for tool calls
    ToolUse,
}

impl From<&str> for StopReason {
    /// Wire value to stop reason; unknown values count as a finished turn
    fn from(value: &str) -> Self {
        match value {
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            "tool_use" => Self::ToolUse,
            _ => Self::EndTurn,
        }
    }
}

/// Token accounting of one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// What the model answered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Assistant message: text blocks and/or tool calls
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A final text answer
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant_blocks(vec![ContentBlock::text(text)]),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// A request to call one tool
    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self::tool_uses(vec![(id.into(), name.into(), input)])
    }

    /// A request to call several tools in one round, as `(id, name, input)`
    pub fn tool_uses(calls: Vec<(String, String, Value)>) -> Self {
        let blocks = calls
            .into_iter()
            .map(|(id, name, input)| ContentBlock::ToolUse { id, name, input })
            .collect();
        Self {
            message: Message::assistant_blocks(blocks),
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        }
    }

    /// Attach token accounting
    pub fn with_usage(mut self, input_tokens: usize, output_tokens: usize) -> Self {
        self.usage = TokenUsage {
            input_tokens,
            output_tokens,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let request = CompletionRequest::builder("claude-sonnet-4-5-20250929")
            .system("Create a blog outline for the given topic.")
            .message(Message::user("multi-agent systems"))
            .build();

        assert_eq!(request.max_tokens, 4096);
        assert_eq!(request.temperature, None);
        assert!(request.tools.is_empty());
        assert_eq!(request.messages.len(), 1);

        let wire = serde_json::to_value(&request).unwrap();
        assert!(wire.get("tools").is_none());
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn test_tool_names() {
        let request = CompletionRequest::builder("m")
            .tools(vec![
                ToolDefinition::new("get_exchange_rate", "rates", json!({})),
                ToolDefinition::new("exit_loop", "stop", json!({})),
            ])
            .build();
        assert_eq!(request.tool_names(), vec!["get_exchange_rate", "exit_loop"]);
    }

    #[test]
    fn test_response_constructors() {
        let answer = CompletionResponse::text("42").with_usage(10, 2);
        assert_eq!(answer.stop_reason, StopReason::EndTurn);
        assert_eq!(answer.message.text(), Some("42"));
        assert_eq!(answer.usage.total(), 12);

        let call = CompletionResponse::tool_use(
            "call_1",
            "get_exchange_rate",
            json!({"base_currency": "USD", "target_currency": "EUR"}),
        );
        assert_eq!(call.stop_reason, StopReason::ToolUse);
        assert_eq!(call.message.tool_calls()[0].name, "get_exchange_rate");
    }

    #[test]
    fn test_stop_reason_from_wire() {
        assert_eq!(StopReason::from("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from("pause_turn"), StopReason::EndTurn);
    }
}
