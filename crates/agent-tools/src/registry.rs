//! Tool registry for managing available tools

use crate::Tool;
use std::sync::Arc;

/// Ordered set of tools available to one agent
///
/// Tools keep their registration order, so the definitions sent to the model
/// are stable from one request to the next. Registering a name twice replaces
/// the earlier tool in place.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// All registered tools, in registration order
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExitLoopTool, FunctionTool, ToolOutcome};
    use serde_json::json;

    fn named(name: &str, description: &str) -> Arc<dyn Tool> {
        let description = description.to_string();
        Arc::new(FunctionTool::new(name, description, json!({}), |_| {
            ToolOutcome::success(json!({}))
        }))
    }

    #[test]
    fn test_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(named("get_fee_for_payment_method", "fees"))
            .with_tool(named("get_exchange_rate", "rates"))
            .with_tool(Arc::new(ExitLoopTool::new()));

        assert_eq!(
            registry.names(),
            vec!["get_fee_for_payment_method", "get_exchange_rate", "exit_loop"]
        );
        assert_eq!(registry.len(), 3);
        assert!(registry.get("get_exchange_rate").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(named("a", "first"));
        registry.register(named("b", "second"));
        registry.register(named("a", "replacement"));

        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().description(), "replacement");
    }

    #[test]
    fn test_empty() {
        let registry = ToolRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.list_tools().is_empty());
    }
}
