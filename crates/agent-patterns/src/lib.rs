//! Multi-agent composition patterns built on agent-rs
//!
//! Each pattern is a small agent tree assembled from the runtime's
//! [`LlmAgent`](agent_runtime::LlmAgent) nodes and the workflow composites:
//!
//! - `single`: one assistant with a web search tool
//! - `coordinator`: a model that calls a researcher and a summarizer as tools
//! - `blog`: outline, draft and edit in a fixed order
//! - `parallel-research`: three researchers at once, then an aggregator
//! - `story-loop`: a first draft refined by a critic/refiner loop
//! - `currency` / `currency-enhanced`: function tools, and a calculator agent
//!   whose Python output is executed
//!
//! # Example
//!
//! ```no_run
//! use agent_patterns::{Pattern, PatternEnv};
//! use agent_runtime::{AgentRuntime, Runner};
//! use agent_llm::LLMProvider;
//! use std::sync::Arc;
//!
//! # async fn example(provider: Arc<dyn LLMProvider>) -> agent_patterns::Result<()> {
//! let runtime = AgentRuntime::builder().provider(provider).build()?;
//! let env = PatternEnv::new(runtime);
//!
//! let root = Pattern::Blog.build(&env)?;
//! let outcome = Runner::new(root).run(Pattern::Blog.sample_prompt()).await?;
//! println!("{}", outcome.output);
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod catalog;
pub mod env;
pub mod error;
pub mod prompts;
pub mod tools;

pub use catalog::{Pattern, build_pattern};
pub use env::PatternEnv;
pub use error::{PatternError, Result};
