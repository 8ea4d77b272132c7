//! Research coordinator: the model decides when to call each specialist

use agent_core::Result;
use agent_runtime::{DelegatingAgent, LlmAgent};
use std::sync::Arc;

use super::search_tool;
use crate::env::PatternEnv;
use crate::prompts;

pub fn research_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("ResearchAgent")
        .description("Finds 2-3 relevant pieces of information on a topic, with citations.")
        .instruction(prompts::RESEARCH_AGENT)
        .tool(search_tool(env))
        .output_key("research_findings")
        .build()
}

pub fn summarizer_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("SummarizerAgent")
        .description("Summarizes the research findings as 3-5 bullet points.")
        .instruction(prompts::SUMMARIZER_AGENT)
        .output_key("final_summary")
        .build()
}

/// `ResearchCoordinator` with the researcher and summarizer as tools
pub fn research_coordinator(env: &PatternEnv) -> Result<DelegatingAgent> {
    env.runtime
        .delegating("ResearchCoordinator")
        .instruction(prompts::RESEARCH_COORDINATOR)
        .sub_agent(Arc::new(research_agent(env)?))
        .sub_agent(Arc::new(summarizer_agent(env)?))
        .build()
}
