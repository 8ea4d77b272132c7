//! Blog pipeline: outline, draft, edit in a fixed order

use agent_core::Result;
use agent_runtime::LlmAgent;
use agent_workflow::SequentialAgent;
use std::sync::Arc;

use crate::env::PatternEnv;
use crate::prompts;

pub fn outline_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("OutlineAgent")
        .instruction(prompts::OUTLINE_AGENT)
        .output_key("blog_outline")
        .build()
}

pub fn writer_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("WriterAgent")
        .instruction(prompts::WRITER_AGENT)
        .output_key("blog_draft")
        .build()
}

/// The editor's text is the pipeline result; it has no slot
pub fn editor_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("EditorAgent")
        .instruction(prompts::EDITOR_AGENT)
        .build()
}

pub fn blog_pipeline(env: &PatternEnv) -> Result<SequentialAgent> {
    SequentialAgent::builder("BlogPipeline")
        .description("Outlines, writes and edits a short blog post.")
        .agent(Arc::new(outline_agent(env)?))
        .agent(Arc::new(writer_agent(env)?))
        .agent(Arc::new(editor_agent(env)?))
        .build()
}
