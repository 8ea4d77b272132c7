//! Shared dependencies of the pattern constructors

use agent_runtime::AgentRuntime;
use agent_tools::{CodeExecutor, DisabledCodeExecutor};
use std::sync::Arc;

use crate::tools::{SearchBackend, StaticSearchBackend};

/// What every pattern is built from
///
/// The runtime supplies the LLM provider and default limits; the search
/// backend feeds the `web_search` tool; the code executor runs the
/// calculation agent's code blocks. Code execution is off unless a real
/// executor is supplied with [`with_code_executor`](Self::with_code_executor).
#[derive(Clone)]
pub struct PatternEnv {
    pub runtime: AgentRuntime,
    pub search: Arc<dyn SearchBackend>,
    pub code_executor: Arc<dyn CodeExecutor>,
}

impl PatternEnv {
    /// Environment with an empty search corpus and code execution disabled
    pub fn new(runtime: AgentRuntime) -> Self {
        Self {
            runtime,
            search: Arc::new(StaticSearchBackend::default()),
            code_executor: Arc::new(DisabledCodeExecutor),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchBackend>) -> Self {
        self.search = search;
        self
    }

    pub fn with_code_executor(mut self, executor: Arc<dyn CodeExecutor>) -> Self {
        self.code_executor = executor;
        self
    }
}
