//! Run driver
//!
//! A [`Runner`] owns the root of an orchestration tree. Each call opens a new
//! run: a fresh blackboard seeded with the runner's initial state, a fresh
//! exit signal, and the runner's cancellation token.

use agent_core::{Agent, Blackboard, CancellationToken, Event, Result, RunContext};
use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// Text returned by the root agent
    pub output: String,

    /// Final blackboard contents
    pub state: HashMap<String, Value>,
}

/// Drives an orchestration tree
///
/// # Example
///
/// ```no_run
/// use agent_runtime::Runner;
/// use agent_core::Agent;
/// use futures::StreamExt;
/// use std::sync::Arc;
///
/// # async fn example(root: Arc<dyn Agent>) -> agent_core::Result<()> {
/// let runner = Runner::new(root);
/// let (mut events, handle) = runner.run_stream("Write a story about a lighthouse");
/// while let Some(event) = events.next().await {
///     println!("[{}] {:?}", event.author, event.kind);
/// }
/// let outcome = handle.await.expect("run task panicked")?;
/// println!("{}", outcome.output);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Runner {
    root: Arc<dyn Agent>,
    initial_state: HashMap<String, Value>,
    cancellation: CancellationToken,
}

impl Runner {
    /// Create a runner for `root`
    pub fn new(root: Arc<dyn Agent>) -> Self {
        Self {
            root,
            initial_state: HashMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Seed every run's blackboard with a value
    pub fn with_state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial_state.insert(key.into(), value.into());
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token that cancels every run of this runner
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// The root agent
    pub fn root(&self) -> &Arc<dyn Agent> {
        &self.root
    }

    fn context(&self, input: String) -> RunContext {
        let blackboard: Blackboard = self
            .initial_state
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        RunContext::new(input)
            .with_blackboard(blackboard)
            .with_cancellation(self.cancellation.clone())
    }

    /// Run to completion without observing events
    pub async fn run(&self, input: impl Into<String>) -> Result<RunOutcome> {
        let ctx = self.context(input.into());
        drive(self.root.as_ref(), ctx).await
    }

    /// Run on a background task, streaming its events
    ///
    /// The stream ends when the run finishes; the handle yields the outcome.
    pub fn run_stream(
        &self,
        input: impl Into<String>,
    ) -> (
        impl Stream<Item = Event> + Send + Unpin + 'static,
        JoinHandle<Result<RunOutcome>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = self.context(input.into()).with_event_sender(tx);
        let root = self.root.clone();

        let handle = tokio::spawn(async move { drive(root.as_ref(), ctx).await });

        let events = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        (Box::pin(events), handle)
    }
}

async fn drive(root: &dyn Agent, ctx: RunContext) -> Result<RunOutcome> {
    let started = Instant::now();
    info!(agent = %root.name(), "Run started");

    match root.run(&ctx).await {
        Ok(output) => {
            info!(
                agent = %root.name(),
                duration_ms = started.elapsed().as_millis() as u64,
                slots = ctx.blackboard().len(),
                "Run completed"
            );
            Ok(RunOutcome {
                output,
                state: ctx.blackboard().snapshot(),
            })
        }
        Err(e) => {
            error!(agent = %root.name(), error = %e, "Run failed");
            Err(e)
        }
    }
}
