//! Per-run execution context
//!
//! A `RunContext` is threaded by reference through every node of an
//! orchestration tree. It bundles the run's [`Blackboard`], the user input the
//! current node should answer, the event sink, the cooperative cancellation
//! token and the loop exit signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::{Blackboard, Error, Event, EventKind, Result};

/// Context passed to agents during execution
///
/// Cloning is cheap: every field is a shared handle.
///
/// # Example
///
/// ```
/// use agent_core::RunContext;
///
/// let ctx = RunContext::new("Write a story about a lighthouse");
/// ctx.blackboard().set("current_story", "draft");
///
/// assert_eq!(ctx.input(), "Write a story about a lighthouse");
/// assert!(!ctx.is_escalated());
/// ```
#[derive(Debug, Clone)]
pub struct RunContext {
    blackboard: Blackboard,
    input: Arc<str>,
    events: Option<UnboundedSender<Event>>,
    cancel: CancellationToken,
    escalation: Arc<AtomicBool>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl RunContext {
    /// Create a context for a new run with an empty blackboard
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            blackboard: Blackboard::new(),
            input: Arc::from(input.into()),
            events: None,
            cancel: CancellationToken::new(),
            escalation: Arc::new(AtomicBool::new(false)),
        }
    }

    // =========== Builder Methods ===========

    /// Use an existing blackboard
    pub fn with_blackboard(mut self, blackboard: Blackboard) -> Self {
        self.blackboard = blackboard;
        self
    }

    /// Forward events to a channel
    pub fn with_event_sender(mut self, sender: UnboundedSender<Event>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Use a cancellation token owned by the driver
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    // =========== Accessors ===========

    /// The run's shared state
    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    /// The user message the current node answers
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The cancellation token threaded through every capability call
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the driver cancelled the run
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with [`Error::Cancelled`] if the run was cancelled
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    // =========== Derived Contexts ===========

    /// Same run, different user message (used when an agent is called as a tool)
    pub fn with_input(&self, input: impl Into<String>) -> Self {
        Self {
            input: Arc::from(input.into()),
            ..self.clone()
        }
    }

    /// Same run with a fresh exit signal
    ///
    /// Loop composites give each pass its own scope so an exit raised inside
    /// one loop never terminates an enclosing loop.
    pub fn escalation_scope(&self) -> Self {
        Self {
            escalation: Arc::new(AtomicBool::new(false)),
            ..self.clone()
        }
    }

    // =========== Signals ===========

    /// Raise the loop exit signal for the current scope
    pub fn escalate(&self) {
        self.escalation.store(true, Ordering::SeqCst);
    }

    /// Whether the exit signal was raised in the current scope
    pub fn is_escalated(&self) -> bool {
        self.escalation.load(Ordering::SeqCst)
    }

    /// Publish an event; dropped silently when nobody listens
    pub fn emit(&self, author: &str, kind: EventKind) {
        if let Some(sender) = &self.events {
            let _ = sender.send(Event::new(author, kind));
        }
    }
}
