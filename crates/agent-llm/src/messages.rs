//! Transcript types exchanged with the capability backend
//!
//! The shapes follow Anthropic's Messages API: a message carries either
//! plain text or a list of blocks, the assistant asks for tools with
//! `tool_use` blocks, and the caller answers every call of a round with
//! `tool_result` blocks in a single user message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Only used by providers that take the system prompt as a message
    System,
}

/// One block of structured message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },

    /// The assistant asks for a tool call
    ToolUse {
        /// Id the matching result must echo
        id: String,
        name: String,
        input: Value,
    },

    /// The answer to one tool call
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Result block for a tool call; `is_error` is only serialized when set
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: is_error.then_some(true),
        }
    }
}

/// Message body: plain text or blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// Borrowed view of a `tool_use` block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCall<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub input: &'a Value,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Message {
    /// User turn with plain text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Assistant turn with plain text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Text(text.into())),
        }
    }

    /// Assistant turn made of blocks (text and tool calls)
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(blocks)),
        }
    }

    /// User turn answering the tool calls of one round
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: Some(MessageContent::Blocks(results)),
        }
    }

    fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            Some(MessageContent::Blocks(blocks)) => blocks,
            _ => &[],
        }
    }

    /// First piece of text in the message
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(text)) => Some(text),
            _ => self.blocks().iter().find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// All text of the message, blocks joined by newlines
    pub fn joined_text(&self) -> String {
        match &self.content {
            Some(MessageContent::Text(text)) => text.clone(),
            _ => self
                .blocks()
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Tool calls requested by this message, in order
    pub fn tool_calls(&self) -> Vec<ToolCall<'_>> {
        self.blocks()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall { id, name, input }),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.blocks()
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }

    /// Content of the first tool result block
    pub fn tool_result_content(&self) -> Option<&str> {
        self.blocks().iter().find_map(|block| match block {
            ContentBlock::ToolResult { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_accessors() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::text("Let me check."),
            ContentBlock::ToolUse {
                id: "t1".to_string(),
                name: "get_exchange_rate".to_string(),
                input: json!({"base_currency": "USD", "target_currency": "EUR"}),
            },
            ContentBlock::text("One moment."),
        ]);

        assert_eq!(msg.text(), Some("Let me check."));
        assert_eq!(msg.joined_text(), "Let me check.\nOne moment.");
        assert_eq!(Message::user("hi").joined_text(), "hi");
    }

    #[test]
    fn test_tool_calls() {
        let msg = Message::assistant_blocks(vec![
            ContentBlock::ToolUse {
                id: "a".to_string(),
                name: "get_fee_for_payment_method".to_string(),
                input: json!({"method": "bank transfer"}),
            },
            ContentBlock::ToolUse {
                id: "b".to_string(),
                name: "exit_loop".to_string(),
                input: json!({}),
            },
        ]);

        let calls = msg.tool_calls();
        assert!(msg.has_tool_calls());
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "get_fee_for_payment_method");
        assert_eq!(calls[1].id, "b");
        assert!(!Message::user("plain").has_tool_calls());
    }

    #[test]
    fn test_tool_result_serialization() {
        let msg = Message::tool_results(vec![
            ContentBlock::tool_result("a", "{\"status\":\"success\"}", false),
            ContentBlock::tool_result("b", "Error: Tool not found: nope", true),
        ]);

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "tool_result");
        assert!(value["content"][0].get("is_error").is_none());
        assert_eq!(value["content"][1]["is_error"], true);
        assert_eq!(msg.tool_result_content(), Some("{\"status\":\"success\"}"));
    }

    #[test]
    fn test_plain_text_round_trip() {
        let json = serde_json::to_string(&Message::user("Test")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Test"}"#);
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text(), Some("Test"));
    }
}
