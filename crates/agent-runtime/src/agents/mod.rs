//! Concrete agent implementations
//!
//! This module provides concrete implementations of the Agent trait:
//! - LlmAgent: a node answering through the LLM capability, with tools and an output slot
//! - DelegatingAgent: a coordinator whose model calls sub-agents as tools

pub mod delegating;
pub mod llm;

pub use delegating::{DelegatingAgent, DelegatingAgentBuilder};
pub use llm::{LlmAgent, LlmAgentBuilder};
