//! Error types for the pattern catalog

use thiserror::Error;

/// Errors raised while selecting or building a pattern
#[derive(Debug, Error)]
pub enum PatternError {
    /// No pattern with this name
    #[error("Unknown pattern '{name}' (available: {available})")]
    UnknownPattern { name: String, available: String },

    /// Building or running the agent tree failed
    #[error(transparent)]
    Agent(#[from] agent_core::Error),
}

/// Result type for pattern operations
pub type Result<T> = std::result::Result<T, PatternError>;
