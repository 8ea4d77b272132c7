//! Failures of a capability call

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status outside the mapped ones
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// 401 or 403
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// 429; retryable
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// 400; not retried
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The service answered with a 5xx status
    #[error("Server error (HTTP {status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Transport failure from the HTTP client
    #[cfg(feature = "anthropic")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Body did not parse as a model response
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing key or bad provider settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transient failures persisted past the retry budget
    #[error("Gave up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// The final failure
        last: Box<LLMError>,
    },
}

impl LLMError {
    /// HTTP status associated with this error, when there is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed => Some(401),
            Self::RateLimitExceeded(_) => Some(429),
            Self::InvalidRequest(_) => Some(400),
            Self::ModelNotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            #[cfg(feature = "anthropic")]
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure happened in transport (timeout or connection) rather than in the service
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "anthropic")]
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
