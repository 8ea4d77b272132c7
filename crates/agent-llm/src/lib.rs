//! Capability layer: what agents send to a model and what comes back
//!
//! [`LLMProvider`] is the single seam to a backend. Requests and responses
//! follow the Messages API shape ([`Message`], [`ContentBlock`]), tools are
//! offered as [`ToolDefinition`]s, and [`RetryingProvider`] applies a
//! [`RetryPolicy`] in front of any provider. The Anthropic backend and its
//! HTTP client sit behind the `anthropic` feature; `mock` adds a scripted
//! provider for tests and doc examples.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod retry;
pub mod tools;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role, ToolCall};
pub use provider::LLMProvider;
pub use retry::{RetryPolicy, RetryingProvider};
pub use tools::ToolDefinition;

#[cfg(feature = "anthropic")]
pub mod providers;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
