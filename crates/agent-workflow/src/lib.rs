//! Multi-agent orchestration for agent-rs
//!
//! Deterministic composites that drive child agents against the run's shared
//! blackboard:
//!
//! - [`SequentialAgent`] runs children one after another, failing fast
//! - [`ParallelAgent`] runs children concurrently and reports every failure
//! - [`LoopAgent`] repeats its children until the exit signal or the iteration bound
//!
//! Composites implement [`agent_core::Agent`] themselves, so they nest freely.

pub mod loop_agent;
pub mod parallel;
pub mod sequential;

#[cfg(test)]
mod testing;

pub use loop_agent::{LoopAgent, LoopAgentBuilder};
pub use parallel::{ParallelAgent, ParallelAgentBuilder};
pub use sequential::{SequentialAgent, SequentialAgentBuilder};
