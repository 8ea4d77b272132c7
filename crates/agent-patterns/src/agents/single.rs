//! A single assistant with web search

use agent_core::Result;
use agent_runtime::LlmAgent;

use super::search_tool;
use crate::env::PatternEnv;
use crate::prompts;

pub fn helpful_assistant(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("helpful_assistant")
        .description("A simple agent that can answer general questions")
        .instruction(prompts::HELPFUL_ASSISTANT)
        .tool(search_tool(env))
        .build()
}
