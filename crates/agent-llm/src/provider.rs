//! Capability backend trait

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A model backend that agents invoke
///
/// One call is one round trip: the response either carries a final answer or
/// asks for tool calls, and the caller decides whether to loop. Retries are
/// not the provider's concern; see [`RetryingProvider`](crate::RetryingProvider).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send one request and wait for the model's answer
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short backend name for logs, e.g. `anthropic`
    fn name(&self) -> &str;
}
