//! The `{status, payload | error_message}` result convention

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Status discriminator every tool result carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// The tool produced its payload
    Success,
    /// The tool could not serve the request; see `error_message`
    Error,
}

/// Structured tool result
///
/// Serializes flat: the payload fields sit next to `status`.
///
/// # Example
///
/// ```
/// use agent_tools::ToolOutcome;
/// use serde_json::json;
///
/// let ok = ToolOutcome::success(json!({"fee_percentage": 0.02}));
/// assert_eq!(ok.into_value(), json!({"status": "success", "fee_percentage": 0.02}));
///
/// let err = ToolOutcome::error("Payment method not found");
/// assert_eq!(
///     err.into_value(),
///     json!({"status": "error", "error_message": "Payment method not found"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Success or error
    pub status: ToolStatus,
    /// Payload fields, or `error_message` for errors
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ToolOutcome {
    /// A successful result
    ///
    /// Object payloads are flattened next to `status`; any other value is
    /// stored under `result`.
    pub fn success(payload: Value) -> Self {
        let mut fields = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        fields.remove("status");
        Self {
            status: ToolStatus::Success,
            fields,
        }
    }

    /// A failed result with an explanation for the model
    pub fn error(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("error_message".to_string(), json!(message.into()));
        Self {
            status: ToolStatus::Error,
            fields,
        }
    }

    /// Add a payload field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "status" {
            self.fields.insert(key, value);
        }
        self
    }

    /// Whether the status is `success`
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Whether the status is `error`
    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }

    /// Error message of a failed result
    pub fn error_message(&self) -> Option<&str> {
        self.fields.get("error_message").and_then(Value::as_str)
    }

    /// A payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Parse a JSON value that follows the convention
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Flat JSON form
    pub fn into_value(self) -> Value {
        let mut map = self.fields;
        map.insert("status".to_string(), json!(self.status));
        Value::Object(map)
    }
}

impl From<ToolOutcome> for Value {
    fn from(outcome: ToolOutcome) -> Self {
        outcome.into_value()
    }
}
