//! Currency conversion with function tools, optionally delegating the math

use agent_core::Result;
use agent_runtime::LlmAgent;
use std::sync::Arc;

use crate::env::PatternEnv;
use crate::prompts;
use crate::tools::{exchange_rate_tool, fee_tool};

/// Looks up fee and rate, does the arithmetic itself
pub fn currency_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("currency_agent")
        .instruction(prompts::CURRENCY_AGENT)
        .tool(Arc::new(fee_tool()))
        .tool(Arc::new(exchange_rate_tool()))
        .build()
}

/// Answers with a Python block; the executor's stdout is appended to its text
pub fn calculation_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("CalculationAgent")
        .description("Generates and runs Python code to compute an arithmetic result.")
        .instruction(prompts::CALCULATION_AGENT)
        .code_executor(env.code_executor.clone())
        .build()
}

/// Like [`currency_agent`], with the calculation handed to [`calculation_agent`]
pub fn enhanced_currency_agent(env: &PatternEnv) -> Result<LlmAgent> {
    env.runtime
        .agent("enhanced_currency_agent")
        .instruction(prompts::ENHANCED_CURRENCY_AGENT)
        .tool(Arc::new(fee_tool()))
        .tool(Arc::new(exchange_rate_tool()))
        .agent_tool(Arc::new(calculation_agent(env)?))
        .build()
}
