//! Scripted child agents for composite tests

use agent_core::{Agent, Error, Result, RunContext};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared record of which agents ran, in order
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Writes `"{name}#{n}"` to its slot, where `n` counts its runs
pub struct StepAgent {
    pub name: String,
    pub slot: Option<String>,
    pub journal: Journal,
    pub delay: Duration,
    pub fail: bool,
    pub escalate_on_run: Option<usize>,
    runs: Mutex<usize>,
}

impl StepAgent {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            slot: None,
            journal: journal.clone(),
            delay: Duration::ZERO,
            fail: false,
            escalate_on_run: None,
            runs: Mutex::new(0),
        }
    }

    pub fn slot(mut self, slot: &str) -> Self {
        self.slot = Some(slot.to_string());
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn escalate_on_run(mut self, run: usize) -> Self {
        self.escalate_on_run = Some(run);
        self
    }

    pub fn shared(self) -> Arc<dyn Agent> {
        Arc::new(self)
    }
}

#[async_trait]
impl Agent for StepAgent {
    async fn run(&self, ctx: &RunContext) -> Result<String> {
        let run = {
            let mut runs = self.runs.lock().unwrap();
            *runs += 1;
            *runs
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.journal.push(format!("{}#{run}", self.name));

        if self.fail {
            return Err(Error::CapabilityFailed(format!("{} broke", self.name)));
        }
        if self.escalate_on_run == Some(run) {
            ctx.escalate();
            return Ok(String::new());
        }

        let text = format!("{}#{run}", self.name);
        if let Some(slot) = &self.slot {
            ctx.blackboard().set(slot.clone(), text.clone());
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn output_slots(&self) -> Vec<String> {
        self.slot.iter().cloned().collect()
    }
}
