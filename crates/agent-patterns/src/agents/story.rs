//! Story refinement: a first draft, then critique and rewrite until approved

use agent_core::Result;
use agent_runtime::LlmAgent;
use agent_tools::ExitLoopTool;
use agent_workflow::{LoopAgent, SequentialAgent};
use std::sync::Arc;

use crate::env::PatternEnv;
use crate::prompts;

/// Upper bound on critique/refine passes
pub const MAX_REFINEMENT_PASSES: usize = 2;

pub fn initial_writer_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("InitialWriterAgent")
        .instruction(prompts::INITIAL_WRITER_AGENT)
        .output_key("current_story")
        .build()
}

pub fn critic_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("CriticAgent")
        .instruction(prompts::CRITIC_AGENT)
        .output_key("critique")
        .build()
}

/// Rewrites `current_story`, or calls `exit_loop` when the critique approves it
pub fn refiner_agent(env: &PatternEnv) -> Result<LlmAgent> {
    let exit = ExitLoopTool::new()
        .with_description(prompts::EXIT_LOOP_DESCRIPTION)
        .with_message(prompts::EXIT_LOOP_MESSAGE);

    env.runtime
        .agent("RefinerAgent")
        .instruction(prompts::REFINER_AGENT)
        .tool(Arc::new(exit))
        .output_key("current_story")
        .build()
}

pub fn story_refinement_loop(env: &PatternEnv) -> Result<LoopAgent> {
    LoopAgent::builder("StoryRefinementLoop")
        .agent(Arc::new(critic_agent(env)?))
        .agent(Arc::new(refiner_agent(env)?))
        .max_iterations(MAX_REFINEMENT_PASSES)
        .build()
}

pub fn story_pipeline(env: &PatternEnv) -> Result<SequentialAgent> {
    SequentialAgent::builder("StoryPipeline")
        .description("Writes a short story and refines it through critique.")
        .agent(Arc::new(initial_writer_agent(env)?))
        .agent(Arc::new(story_refinement_loop(env)?))
        .build()
}
