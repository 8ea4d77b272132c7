//! Scripted provider for tests and offline runs
//!
//! [`ScriptedProvider`] answers every request by calling a closure, and keeps
//! a copy of each request so tests can assert on what agents sent.

use crate::{CompletionRequest, CompletionResponse, LLMProvider, Result};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

type Responder = dyn Fn(&CompletionRequest) -> Result<CompletionResponse> + Send + Sync;
type Latency = dyn Fn(&CompletionRequest) -> Duration + Send + Sync;

/// Provider whose answers come from a closure
///
/// # Example
///
/// ```
/// use agent_llm::mock::ScriptedProvider;
/// use agent_llm::CompletionResponse;
///
/// let provider = ScriptedProvider::new(|request| {
///     let system = request.system.as_deref().unwrap_or_default();
///     Ok(CompletionResponse::text(format!("echo: {system}")))
/// });
/// assert_eq!(provider.request_count(), 0);
/// ```
pub struct ScriptedProvider {
    responder: Box<Responder>,
    latency: Option<Box<Latency>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Create a provider from a response function
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<CompletionResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            latency: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delay each answer by an amount chosen per request
    pub fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Box::new(latency));
        self
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&request)).await;
        }

        (self.responder)(&request)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[tokio::test]
    async fn test_records_requests() {
        let provider = ScriptedProvider::new(|_| Ok(CompletionResponse::text("ok")));
        let request = CompletionRequest::builder("m")
            .message(Message::user("hello"))
            .build();

        let response = provider.complete(request).await.unwrap();

        assert_eq!(response.message.text(), Some("ok"));
        assert_eq!(provider.request_count(), 1);
        assert_eq!(provider.requests()[0].messages[0].text(), Some("hello"));
    }

    #[test]
    fn test_responder_errors_pass_through() {
        let provider = ScriptedProvider::new(|_| {
            Err(crate::LLMError::RateLimitExceeded("slow down".to_string()))
        });
        let request = CompletionRequest::builder("m").build();

        let result = tokio_test::block_on(provider.complete(request));

        assert!(matches!(result, Err(crate::LLMError::RateLimitExceeded(_))));
        assert_eq!(provider.request_count(), 1);
    }
}
