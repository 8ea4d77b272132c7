//! Plain function tools
//!
//! A [`FunctionTool`] wraps a closure together with the name, description and
//! JSON schema the model sees. Closures return a [`ToolOutcome`]; business
//! misses (unknown key, unsupported pair) are `error` outcomes, not `Err`.

use crate::{Tool, ToolOutcome};
use agent_core::{Result, RunContext};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

type Handler = dyn Fn(Value) -> BoxFuture<'static, Result<ToolOutcome>> + Send + Sync;

/// Tool backed by a Rust function
///
/// # Example
///
/// ```
/// use agent_tools::{FunctionTool, Tool, ToolOutcome};
/// use serde_json::json;
///
/// let tool = FunctionTool::new(
///     "get_greeting",
///     "Greets a person by name.",
///     json!({
///         "type": "object",
///         "properties": {"name": {"type": "string"}},
///         "required": ["name"]
///     }),
///     |args| {
///         let name = args["name"].as_str().unwrap_or("stranger");
///         ToolOutcome::success(json!({"greeting": format!("Hello, {name}!")}))
///     },
/// );
/// assert_eq!(tool.name(), "get_greeting");
/// ```
pub struct FunctionTool {
    name: String,
    description: String,
    input_schema: Value,
    handler: Box<Handler>,
}

impl FunctionTool {
    /// Create a tool from a synchronous function
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        F: Fn(Value) -> ToolOutcome + Send + Sync + 'static,
    {
        Self::new_async(name, description, input_schema, move |args| {
            let outcome = f(args);
            async move { Ok(outcome) }
        })
    }

    /// Create a tool from an async function
    ///
    /// Returning `Err` from the future reports a tool failure to the runtime;
    /// prefer [`ToolOutcome::error`] for lookups that simply miss.
    pub fn new_async<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutcome>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler: Box::new(move |args| f(args).boxed()),
        }
    }

    /// Create a tool whose arguments are deserialized into `A`
    ///
    /// Arguments that do not fit `A` produce an `error` outcome describing
    /// the problem, so the model can correct its call.
    pub fn typed<A, F>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        f: F,
    ) -> Self
    where
        A: DeserializeOwned,
        F: Fn(A) -> ToolOutcome + Send + Sync + 'static,
    {
        Self::new(name, description, input_schema, move |args| {
            match serde_json::from_value::<A>(args) {
                Ok(parsed) => f(parsed),
                Err(e) => ToolOutcome::error(format!("Invalid arguments: {e}")),
            }
        })
    }
}

#[async_trait]
impl Tool for FunctionTool {
    async fn execute(&self, params: Value, _ctx: &RunContext) -> Result<Value> {
        let outcome = (self.handler)(params).await?;
        Ok(outcome.into_value())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
