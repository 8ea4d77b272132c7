//! Constructors for the agent trees of each pattern

pub mod blog;
pub mod coordinator;
pub mod currency;
pub mod research;
pub mod single;
pub mod story;

use agent_tools::Tool;
use std::sync::Arc;

use crate::env::PatternEnv;
use crate::tools::WebSearchTool;

fn search_tool(env: &PatternEnv) -> Arc<dyn Tool> {
    Arc::new(WebSearchTool::new(env.search.clone()))
}
