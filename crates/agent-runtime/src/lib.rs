//! Agent runtime for agent-rs
//!
//! This crate provides the runtime infrastructure for executing agents:
//! the [`AgentExecutor`] capability loop, the [`LlmAgent`] node, the
//! [`DelegatingAgent`] coordinator, the [`AgentRuntime`] factory and the
//! [`Runner`] that drives an orchestration tree.

pub mod agents;
pub mod executor;
pub mod runner;
pub mod runtime;

// Re-export key types
pub use agents::{DelegatingAgent, DelegatingAgentBuilder, LlmAgent, LlmAgentBuilder};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig, Turn};
pub use runner::{RunOutcome, Runner};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
