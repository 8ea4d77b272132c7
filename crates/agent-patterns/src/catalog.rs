//! Pattern lookup by name

use agent_core::Agent;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::agents::{blog, coordinator, currency, research, single, story};
use crate::env::PatternEnv;
use crate::error::{PatternError, Result};

/// The composition patterns that can be run by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// One assistant with web search
    Single,
    /// A coordinator model calling a researcher and a summarizer as tools
    Coordinator,
    /// Outline, write, edit in sequence
    Blog,
    /// Three researchers in parallel, then an aggregator
    ParallelResearch,
    /// Draft once, then critique and refine in a bounded loop
    StoryLoop,
    /// Fee and exchange-rate tools
    Currency,
    /// Fee and exchange-rate tools plus a code-executing calculator agent
    CurrencyEnhanced,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::Single,
        Pattern::Coordinator,
        Pattern::Blog,
        Pattern::ParallelResearch,
        Pattern::StoryLoop,
        Pattern::Currency,
        Pattern::CurrencyEnhanced,
    ];

    /// Name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Pattern::Single => "single",
            Pattern::Coordinator => "coordinator",
            Pattern::Blog => "blog",
            Pattern::ParallelResearch => "parallel-research",
            Pattern::StoryLoop => "story-loop",
            Pattern::Currency => "currency",
            Pattern::CurrencyEnhanced => "currency-enhanced",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Pattern::Single => "Single assistant with web search",
            Pattern::Coordinator => "Coordinator model delegating to research and summary agents",
            Pattern::Blog => "Sequential outline, draft and edit pipeline",
            Pattern::ParallelResearch => "Parallel tech/health/finance research with an aggregator",
            Pattern::StoryLoop => "Story draft refined by a critic/refiner loop (max 2 passes)",
            Pattern::Currency => "Currency conversion with fee and exchange-rate tools",
            Pattern::CurrencyEnhanced => "Currency conversion with a code-executing calculator agent",
        }
    }

    /// A prompt that exercises the pattern
    pub fn sample_prompt(self) -> &'static str {
        match self {
            Pattern::Single => {
                "What is Agent Development Kit from Google? What languages is the SDK available in?"
            }
            Pattern::Coordinator => {
                "What are the latest advancements in quantum computing and what do they mean for AI?"
            }
            Pattern::Blog => {
                "Write a blog post about the benefits of multi-agent systems for software developers"
            }
            Pattern::ParallelResearch => {
                "Run the daily executive briefing on Tech, Health, and Finance"
            }
            Pattern::StoryLoop => {
                "Write a short story about a lighthouse keeper who discovers a mysterious, glowing map"
            }
            Pattern::Currency => {
                "I want to convert 500 US Dollars to Euros using my Platinum Credit Card. How much will I receive?"
            }
            Pattern::CurrencyEnhanced => {
                "Convert 1,250 USD to INR using a Bank Transfer. Show me the precise calculation."
            }
        }
    }

    /// Build the root agent of the pattern
    pub fn build(self, env: &PatternEnv) -> agent_core::Result<Arc<dyn Agent>> {
        let root: Arc<dyn Agent> = match self {
            Pattern::Single => Arc::new(single::helpful_assistant(env)?),
            Pattern::Coordinator => Arc::new(coordinator::research_coordinator(env)?),
            Pattern::Blog => Arc::new(blog::blog_pipeline(env)?),
            Pattern::ParallelResearch => Arc::new(research::research_system(env)?),
            Pattern::StoryLoop => Arc::new(story::story_pipeline(env)?),
            Pattern::Currency => Arc::new(currency::currency_agent(env)?),
            Pattern::CurrencyEnhanced => Arc::new(currency::enhanced_currency_agent(env)?),
        };
        Ok(root)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Pattern::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| PatternError::UnknownPattern {
                name: s.to_string(),
                available: Pattern::ALL.map(Pattern::name).join(", "),
            })
    }
}

/// Parse a pattern name and build its root agent
pub fn build_pattern(name: &str, env: &PatternEnv) -> Result<Arc<dyn Agent>> {
    let pattern: Pattern = name.parse()?;
    Ok(pattern.build(env)?)
}
