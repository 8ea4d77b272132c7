//! Tool management and execution framework for agent-rs
//!
//! Tools are the actions a model can take during an agent's turn. This crate
//! provides the [`Tool`] trait, the `{status, ...}` result convention
//! ([`ToolOutcome`]), and the stock tool kinds:
//!
//! - [`FunctionTool`] wraps a Rust function
//! - [`AgentTool`] lets one agent call another
//! - [`ExitLoopTool`] ends the enclosing refinement loop
//! - [`CodeExecutionTool`] runs model-written code through a [`CodeExecutor`]

pub mod agent_tool;
pub mod code;
pub mod exit;
pub mod function;
pub mod outcome;
pub mod registry;
pub mod tool;

pub use agent_tool::AgentTool;
pub use code::{
    CodeExecutionResult, CodeExecutionTool, CodeExecutor, DisabledCodeExecutor, ProcessCodeExecutor,
    extract_code_blocks,
};
pub use exit::{EXIT_LOOP_TOOL, ExitLoopTool};
pub use function::FunctionTool;
pub use outcome::{ToolOutcome, ToolStatus};
pub use registry::ToolRegistry;
pub use tool::Tool;
