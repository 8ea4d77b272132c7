//! Error types for agent-core

use std::fmt;
use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// A failure reported by one child of a composite, tagged with the child's name
#[derive(Debug)]
pub struct ChildFailure {
    /// Name of the child that failed
    pub child: String,
    /// The error the child returned
    pub error: Error,
}

impl fmt::Display for ChildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.child, self.error)
    }
}

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// An instruction template referenced blackboard keys that are not set
    #[error("Template references missing blackboard keys: {}", missing.join(", "))]
    TemplateResolution {
        /// Keys that could not be resolved, in order of appearance
        missing: Vec<String>,
    },

    /// A tool could not produce a result
    ///
    /// Inside the tool-call loop this is turned into an error tool result
    /// for the model to handle; it only escapes when a tool is invoked directly.
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution {
        /// Tool name
        tool: String,
        /// What went wrong
        message: String,
    },

    /// Transient capability failures persisted past the retry budget
    #[error("Capability exhausted after {attempts} attempt(s): {message}")]
    CapabilityExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The last failure
        message: String,
    },

    /// The capability failed with an error that is not worth retrying
    #[error("Capability invocation failed: {0}")]
    CapabilityFailed(String),

    /// One or more children of a parallel composite failed
    #[error("{} child(ren) of '{composite}' failed: {}", failures.len(), join_failures(failures))]
    CompositeAggregate {
        /// Name of the composite
        composite: String,
        /// Every child failure, in declaration order
        failures: Vec<ChildFailure>,
    },

    /// The orchestration tree was assembled incorrectly
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run was cancelled by the driver
    #[error("Run cancelled")]
    Cancelled,

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),
}

fn join_failures(failures: &[ChildFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Shorthand for a tool execution error
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether a tool-call loop may hand this error back to the model instead of aborting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ToolExecution { .. })
    }

    /// Child failures carried by a composite error, empty for every other variant
    pub fn child_failures(&self) -> &[ChildFailure] {
        match self {
            Self::CompositeAggregate { failures, .. } => failures,
            _ => &[],
        }
    }
}
