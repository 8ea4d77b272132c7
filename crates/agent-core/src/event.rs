//! Events emitted while an orchestration tree runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A node started running
    Started,

    /// A loop composite started a pass (1-based)
    Iteration {
        /// Pass number
        iteration: usize,
    },

    /// The model asked for a tool
    ToolCall {
        /// Tool use id assigned by the model
        id: String,
        /// Tool name
        name: String,
        /// Arguments
        input: Value,
    },

    /// A tool returned
    ToolResult {
        /// Tool use id this answers
        id: String,
        /// Tool name
        name: String,
        /// Serialized result handed back to the model
        content: String,
        /// Whether the tool reported a failure
        is_error: bool,
    },

    /// An agent produced its final text
    Text {
        /// The text
        content: String,
    },

    /// An agent wrote its output slot
    StateUpdate {
        /// Slot name
        key: String,
        /// Stored value
        value: Value,
    },

    /// A tool raised the loop exit signal
    Escalate,
}

/// One item of the event stream of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Name of the node that emitted the event
    pub author: String,
    /// Payload
    pub kind: EventKind,
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn new(author: impl Into<String>, kind: EventKind) -> Self {
        Self {
            author: author.into(),
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Text content, if this is a final-output event
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Text { content } => Some(content),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_accessor() {
        let event = Event::new(
            "WriterAgent",
            EventKind::Text {
                content: "draft".to_string(),
            },
        );
        assert_eq!(event.text(), Some("draft"));
        assert_eq!(Event::new("WriterAgent", EventKind::Started).text(), None);
    }

    #[test]
    fn test_serialization_is_tagged() {
        let event = Event::new(
            "RefinerAgent",
            EventKind::StateUpdate {
                key: "current_story".to_string(),
                value: json!("v2"),
            },
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["author"], "RefinerAgent");
        assert_eq!(value["kind"]["type"], "state_update");
        assert_eq!(value["kind"]["key"], "current_story");
    }
}
