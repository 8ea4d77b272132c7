//! Core abstractions for agent-rs
//!
//! This crate defines the fundamental traits and types shared by every layer
//! of an orchestration tree: the [`Agent`] node contract, the per-run
//! [`Blackboard`] and [`RunContext`], the [`Event`] stream items and the
//! error taxonomy.

pub mod agent;
pub mod blackboard;
pub mod context;
pub mod error;
pub mod event;

pub use agent::Agent;
pub use blackboard::Blackboard;
pub use context::RunContext;
pub use error::{ChildFailure, Error, Result};
pub use event::{Event, EventKind};

// Re-exported so drivers can cancel runs without a direct dependency
pub use tokio_util::sync::CancellationToken;
