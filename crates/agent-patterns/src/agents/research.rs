//! Parallel research: three independent researchers, then an aggregator

use agent_core::Result;
use agent_runtime::LlmAgent;
use agent_workflow::{ParallelAgent, SequentialAgent};
use std::sync::Arc;

use super::search_tool;
use crate::env::PatternEnv;
use crate::prompts;

fn researcher(env: &PatternEnv, name: &str, instruction: &str, slot: &str) -> Result<LlmAgent> {
    env.runtime
        .agent(name)
        .instruction(instruction)
        .tool(search_tool(env))
        .output_key(slot)
        .build()
}

pub fn tech_researcher(env: &PatternEnv) -> Result<LlmAgent> {
    researcher(env, "TechResearcher", prompts::TECH_RESEARCHER, "tech_research")
}

pub fn health_researcher(env: &PatternEnv) -> Result<LlmAgent> {
    researcher(env, "HealthResearcher", prompts::HEALTH_RESEARCHER, "health_research")
}

pub fn finance_researcher(env: &PatternEnv) -> Result<LlmAgent> {
    researcher(env, "FinanceResearcher", prompts::FINANCE_RESEARCHER, "finance_research")
}

pub fn aggregator_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("AggregatorAgent")
        .instruction(prompts::AGGREGATOR_AGENT)
        .output_key("executive_summary")
        .build()
}

pub fn parallel_research_team(env: &PatternEnv) -> Result<ParallelAgent> {
    ParallelAgent::builder("ParallelResearchTeam")
        .agent(Arc::new(tech_researcher(env)?))
        .agent(Arc::new(health_researcher(env)?))
        .agent(Arc::new(finance_researcher(env)?))
        .build()
}

/// Research team first, aggregator once all three reports are in
pub fn research_system(env: &PatternEnv) -> Result<SequentialAgent> {
    SequentialAgent::builder("ResearchSystem")
        .description("Researches tech, health and finance in parallel and writes an executive summary.")
        .agent(Arc::new(parallel_research_team(env)?))
        .agent(Arc::new(aggregator_agent(env)?))
        .build()
}
