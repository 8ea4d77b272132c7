//! Command-line driver for agent-rs composition patterns
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//! agent-cli --list
//! agent-cli story-loop "Write a story about a lighthouse keeper"
//! agent-cli blog --config agent.toml --json-logs
//! agent-cli currency-enhanced --allow-local-code
//! ```

use agent_core::{Event, EventKind};
use agent_llm::providers::AnthropicProvider;
use agent_llm::{LLMProvider, RetryPolicy, RetryingProvider};
use agent_patterns::tools::{SearchBackend, StaticSearchBackend};
use agent_patterns::{Pattern, PatternEnv};
use agent_runtime::{AgentRuntime, RunOutcome, Runner, RuntimeConfig};
use agent_tools::ProcessCodeExecutor;
use agent_utils::{Config, LogFormat};
use anyhow::Context as _;
use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(about = "Run a multi-agent composition pattern", long_about = None)]
struct Args {
    /// Pattern to run (see --list)
    pattern: Option<String>,

    /// User prompt; defaults to the pattern's sample prompt
    prompt: Option<String>,

    /// List the available patterns and exit
    #[arg(short, long)]
    list: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the model for every agent
    #[arg(short, long)]
    model: Option<String>,

    /// JSON array of {title, url, snippet} documents served by web_search
    #[arg(long)]
    search_corpus: Option<PathBuf>,

    /// Run model-written Python on this machine with `python3` (not sandboxed)
    #[arg(long)]
    allow_local_code: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Only print the final output and state
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    let log_format = if args.json_logs {
        LogFormat::Json
    } else {
        config.log_format
    };
    agent_utils::init_tracing_with(log_format);

    let Some(name) = args.pattern.as_deref().filter(|_| !args.list) else {
        print_patterns();
        return Ok(());
    };
    let pattern: Pattern = name.parse()?;
    let prompt = args
        .prompt
        .clone()
        .unwrap_or_else(|| pattern.sample_prompt().to_string());

    let provider: Arc<dyn LLMProvider> =
        Arc::new(AnthropicProvider::from_env().context("Failed to create Anthropic provider")?);
    let provider = Arc::new(RetryingProvider::new(
        provider,
        RetryPolicy::from(&config.retry),
    ));
    let runtime = AgentRuntime::builder()
        .provider(provider)
        .config(RuntimeConfig::from(&config))
        .build()?;

    let search: Arc<dyn SearchBackend> = match &args.search_corpus {
        Some(path) => Arc::new(StaticSearchBackend::from_json_file(path)?),
        None => Arc::new(StaticSearchBackend::bundled()?),
    };
    let mut env = PatternEnv::new(runtime).with_search(search);
    if args.allow_local_code {
        warn!("Local code execution enabled: generated Python runs unsandboxed on this host");
        env = env.with_code_executor(Arc::new(ProcessCodeExecutor::python()));
    }

    let root = pattern.build(&env)?;
    info!(pattern = %pattern, agent = %root.name(), model = %config.model, "Starting run");

    let runner = Runner::new(root);
    let cancel = runner.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            cancel.cancel();
        }
    });

    println!("User: {prompt}\n");
    let (mut events, handle) = runner.run_stream(prompt);
    while let Some(event) = events.next().await {
        if !args.quiet {
            print_event(&event);
        }
    }
    let outcome = handle.await.context("Run task panicked")??;

    print_outcome(&outcome);
    Ok(())
}

fn print_patterns() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Pattern", "Description"]);
    for pattern in Pattern::ALL {
        table.add_row(vec![pattern.name(), pattern.summary()]);
    }
    println!("{table}");
}

fn print_event(event: &Event) {
    let time = event.timestamp.format("%H:%M:%S");
    let author = &event.author;
    match &event.kind {
        EventKind::Started => println!("{time} [{author}] started"),
        EventKind::Iteration { iteration } => println!("{time} [{author}] pass {iteration}"),
        EventKind::ToolCall { name, input, .. } => {
            println!("{time} [{author}] -> {name} {input}");
        }
        EventKind::ToolResult {
            name,
            content,
            is_error,
            ..
        } => {
            let marker = if *is_error { "!!" } else { "<-" };
            println!("{time} [{author}] {marker} {name} {}", preview(content, 200));
        }
        EventKind::Text { content } => println!("{time} [{author}]\n{content}\n"),
        EventKind::StateUpdate { key, .. } => println!("{time} [{author}] wrote '{key}'"),
        EventKind::Escalate => println!("{time} [{author}] exit signal raised"),
    }
}

fn print_outcome(outcome: &RunOutcome) {
    println!("\n=== Final output ===\n{}\n", outcome.output);

    if outcome.state.is_empty() {
        return;
    }
    let mut keys: Vec<&String> = outcome.state.keys().collect();
    keys.sort();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Slot", "Value"]);
    for key in keys {
        let value = match &outcome.state[key] {
            Value::String(text) => preview(text, 300),
            other => preview(&other.to_string(), 300),
        };
        table.add_row(vec![key.clone(), value]);
    }
    println!("{table}");
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
