//! Retry logic with exponential backoff
//!
//! [`RetryPolicy`] is an immutable settings object; [`RetryingProvider`]
//! applies it to every completion request of the provider it wraps. Only
//! transient failures (retryable HTTP statuses, timeouts, connection errors)
//! are retried. Anything else is returned on the first occurrence.

use crate::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Result};
use agent_utils::{MAX_BACKOFF_MULTIPLIER, MAX_RETRY_DELAY_SECS, RetrySettings};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Backoff multiplier applied per retry
    pub backoff_multiplier: f64,

    /// Maximum delay between attempts
    pub max_delay: Duration,

    /// HTTP statuses treated as transient
    pub retryable_status_codes: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    /// Out-of-range delays are clamped to `0..=MAX_RETRY_DELAY_SECS`; NaN counts as zero
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.attempts.max(1),
            base_delay: clamped_delay(settings.initial_delay_secs),
            backoff_multiplier: if settings.backoff_multiplier.is_finite() {
                settings.backoff_multiplier.clamp(1.0, MAX_BACKOFF_MULTIPLIER)
            } else {
                1.0
            },
            max_delay: clamped_delay(settings.max_delay_secs),
            retryable_status_codes: settings.http_status_codes.iter().copied().collect(),
        }
    }
}

fn clamped_delay(secs: f64) -> Duration {
    let ceiling = Duration::from_secs_f64(MAX_RETRY_DELAY_SECS);
    Duration::try_from_secs_f64(secs.max(0.0)).map_or(ceiling, |delay| delay.min(ceiling))
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        backoff_multiplier: f64,
        retryable_status_codes: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff_multiplier,
            max_delay: Duration::from_secs(60),
            retryable_status_codes: retryable_status_codes.into_iter().collect(),
        }
    }

    /// Set the maximum delay between attempts
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            max_delay: Duration::ZERO,
            retryable_status_codes: BTreeSet::new(),
        }
    }

    /// Create a policy with fast retries (for testing)
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(50),
            retryable_status_codes: [429, 500, 503, 504].into_iter().collect(),
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.base_delay.as_millis() as f64
            * self.backoff_multiplier.powi((retry - 1) as i32);
        let delay = Duration::from_millis(delay_ms.min(u64::MAX as f64) as u64);

        delay.min(self.max_delay)
    }

    /// Check if an error is worth another attempt
    pub fn is_retryable(&self, error: &LLMError) -> bool {
        if error.is_transport() {
            return true;
        }
        error
            .status_code()
            .is_some_and(|status| self.retryable_status_codes.contains(&status))
    }

    /// Execute an async operation with retry logic
    ///
    /// Returns the first success, the first non-retryable error unchanged, or
    /// [`LLMError::RetriesExhausted`] carrying the last transient error.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                operation = operation_name,
                attempt,
                max_attempts = self.max_attempts,
                "Attempting operation"
            );

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            operation = operation_name,
                            retries = attempt - 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !self.is_retryable(&e) => {
                    debug!(operation = operation_name, error = %e, "Non-retryable error");
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    warn!(
                        operation = operation_name,
                        attempts = attempt,
                        error = %e,
                        "Retries exhausted"
                    );
                    return Err(LLMError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "Transient failure, retrying"
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}

/// Provider decorator that applies a [`RetryPolicy`] to every request
pub struct RetryingProvider {
    inner: Arc<dyn LLMProvider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    /// Wrap a provider
    pub fn new(inner: Arc<dyn LLMProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl LLMProvider for RetryingProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let inner = &self.inner;
        self.policy
            .execute("complete", || inner.complete(request.clone()))
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use mockall::mock;
    use std::sync::atomic::{AtomicU32, Ordering};

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::builder("test-model")
            .message(Message::user("hi"))
            .build()
    }

    #[test]
    fn test_default_policy_matches_settings() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 7.0);
        assert!(policy.retryable_status_codes.contains(&429));
        assert!(policy.retryable_status_codes.contains(&504));
        assert!(!policy.retryable_status_codes.contains(&400));
    }

    #[test]
    fn test_unvalidated_settings_are_clamped() {
        let settings = RetrySettings {
            initial_delay_secs: 1e30,
            max_delay_secs: f64::INFINITY,
            backoff_multiplier: f64::NAN,
            ..RetrySettings::default()
        };

        let policy = RetryPolicy::from(&settings);

        assert_eq!(policy.base_delay, Duration::from_secs(3600));
        assert_eq!(policy.max_delay, Duration::from_secs(3600));
        assert_eq!(policy.backoff_multiplier, 1.0);
        assert_eq!(policy.backoff_duration(3), Duration::from_secs(3600));
    }

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), 2.0, [503])
            .with_max_delay(Duration::from_secs(10));

        assert_eq!(policy.backoff_duration(0), Duration::ZERO);
        assert_eq!(policy.backoff_duration(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_duration(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_duration(3), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(2), Duration::from_secs(7));
        assert_eq!(policy.backoff_duration(3), Duration::from_secs(49));
        assert_eq!(policy.backoff_duration(4), Duration::from_secs(60));
    }

    #[test]
    fn test_is_retryable() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&LLMError::RateLimitExceeded("x".to_string())));
        assert!(policy.is_retryable(&LLMError::ServerError {
            status: 503,
            message: "x".to_string()
        }));
        assert!(!policy.is_retryable(&LLMError::ServerError {
            status: 502,
            message: "x".to_string()
        }));
        assert!(!policy.is_retryable(&LLMError::InvalidRequest("x".to_string())));
        assert!(!policy.is_retryable(&LLMError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_execute_success_after_retry() {
        let policy = RetryPolicy::fast();
        let attempts = AtomicU32::new(0);

        let result = policy
            .execute("test_op", || {
                let current = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if current < 2 {
                        Err(LLMError::RateLimitExceeded("busy".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_execute_exhausts_budget() {
        let policy = RetryPolicy::fast();
        let attempts = AtomicU32::new(0);

        let result: Result<()> = policy
            .execute("test_op", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(LLMError::ServerError {
                        status: 500,
                        message: "boom".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(LLMError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_non_retryable_error() {
        let policy = RetryPolicy::fast();
        let attempts = AtomicU32::new(0);

        let result: Result<()> = policy
            .execute("test_op", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(LLMError::InvalidRequest("bad schema".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(LLMError::InvalidRequest(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retrying_provider_retries_transient_failures() {
        let mut provider = MockProvider::new();
        let mut calls = 0;
        provider.expect_complete().times(3).returning(move |_| {
            calls += 1;
            if calls < 3 {
                Err(LLMError::ServerError {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(CompletionResponse::text("done"))
            }
        });
        provider.expect_name().return_const("mock".to_string());

        let retrying = RetryingProvider::new(Arc::new(provider), RetryPolicy::fast());
        let response = retrying.complete(request()).await.unwrap();

        assert_eq!(response.message.text(), Some("done"));
        assert_eq!(retrying.name(), "mock");
    }

    #[tokio::test]
    async fn test_retrying_provider_does_not_retry_semantic_errors() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::AuthenticationFailed));

        let retrying = RetryingProvider::new(Arc::new(provider), RetryPolicy::fast());
        let err = retrying.complete(request()).await.unwrap_err();

        assert!(matches!(err, LLMError::AuthenticationFailed));
    }
}
