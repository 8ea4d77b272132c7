//! Tool definitions offered to the model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool as the model sees it: name, description and JSON schema of the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Must match the name the tool is registered under
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON schema shorthands for tool inputs
///
/// ```
/// use agent_llm::tools::schema;
/// use serde_json::json;
///
/// let input = schema::object(
///     json!({
///         "base_currency": schema::string("ISO 4217 code to convert from"),
///         "target_currency": schema::string("ISO 4217 code to convert to"),
///     }),
///     vec!["base_currency", "target_currency"],
/// );
/// assert_eq!(input["required"][1], "target_currency");
/// ```
pub mod schema {
    use serde_json::{Value, json};

    /// Object with the given properties
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Object without properties, for tools that take no input
    pub fn empty() -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn described(kind: &str, description: &str) -> Value {
        json!({ "type": kind, "description": description })
    }

    pub fn string(description: &str) -> Value {
        described("string", description)
    }

    pub fn number(description: &str) -> Value {
        described("number", description)
    }

    /// String limited to `values`
    pub fn string_enum(description: &str, values: &[&str]) -> Value {
        let mut schema = described("string", description);
        schema["enum"] = json!(values);
        schema
    }
}
