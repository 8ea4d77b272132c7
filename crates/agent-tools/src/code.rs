//! Code execution
//!
//! A [`CodeExecutor`] runs model-written source and reports what it printed.
//! Agents configured with an executor run the fenced code blocks of their
//! answers (see [`extract_code_blocks`]); [`CodeExecutionTool`] exposes the
//! same backend to the model as an explicit tool.

use crate::{Tool, ToolOutcome};
use agent_core::{Error, Result, RunContext};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::process::Stdio;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:python3|python|py|tool_code)?[ \t]*\r?\n(.*?)```")
        .expect("code block pattern is valid")
});

/// Source of every fenced block tagged python (or untagged) in `text`
///
/// Blocks tagged with other languages are skipped.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    CODE_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
        .filter(|code| !code.trim().is_empty())
        .collect()
}

/// What a piece of code printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CodeExecutionResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Backend that runs source code
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Run `source` to completion
    ///
    /// # Errors
    ///
    /// `ToolExecution` when the code could not be started or timed out. A
    /// program that runs and fails is a successful execution with a non-zero
    /// exit code.
    async fn execute(&self, source: &str) -> Result<CodeExecutionResult>;

    /// Language the executor expects, used in prompts
    fn language(&self) -> &str {
        "python"
    }
}

/// Executor that refuses to run anything
///
/// The default for environments where host execution was not switched on;
/// every call is a recoverable tool error, so the model can explain it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCodeExecutor;

#[async_trait]
impl CodeExecutor for DisabledCodeExecutor {
    async fn execute(&self, _source: &str) -> Result<CodeExecutionResult> {
        Err(Error::tool("code_executor", "code execution disabled"))
    }
}

/// Runs code in a child process on the host, e.g. `python3 -c <source>`
///
/// Not a sandbox: the code runs with the permissions of this process.
#[derive(Debug, Clone)]
pub struct ProcessCodeExecutor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for ProcessCodeExecutor {
    fn default() -> Self {
        Self::python()
    }
}

impl ProcessCodeExecutor {
    /// Executor invoking `program args... <source>`
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: Duration::from_secs(30),
        }
    }

    /// `python3 -c`
    pub fn python() -> Self {
        Self::new("python3", ["-c"])
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CodeExecutor for ProcessCodeExecutor {
    async fn execute(&self, source: &str) -> Result<CodeExecutionResult> {
        debug!(program = %self.program, bytes = source.len(), "Executing code");

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(program = %self.program, error = %e, "Failed to start code executor");
                return Err(Error::tool(
                    "code_executor",
                    format!("failed to start {}: {e}", self.program),
                ));
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Code execution timed out");
                return Err(Error::tool(
                    "code_executor",
                    format!("execution timed out after {:?}", self.timeout),
                ));
            }
        };

        Ok(CodeExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Tool giving the model direct access to a [`CodeExecutor`]
pub struct CodeExecutionTool {
    executor: Arc<dyn CodeExecutor>,
}

impl CodeExecutionTool {
    pub fn new(executor: Arc<dyn CodeExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for CodeExecutionTool {
    async fn execute(&self, params: Value, ctx: &RunContext) -> Result<Value> {
        let Some(code) = params.get("code").and_then(Value::as_str) else {
            return Err(Error::tool(self.name(), "missing required argument 'code'"));
        };

        let result = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => return Err(Error::Cancelled),
            result = self.executor.execute(code) => result,
        };
        let outcome = match result {
            Ok(run) if run.succeeded() => ToolOutcome::success(json!({
                "stdout": run.stdout,
                "stderr": run.stderr,
                "exit_code": run.exit_code,
            })),
            Ok(run) => ToolOutcome::error(format!(
                "Execution failed with exit code {}: {}",
                run.exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()),
                run.stderr.trim()
            ))
            .with_field("stdout", json!(run.stdout))
            .with_field("exit_code", json!(run.exit_code)),
            Err(e) => ToolOutcome::error(e.to_string()),
        };

        Ok(outcome.into_value())
    }

    fn name(&self) -> &str {
        "execute_code"
    }

    fn description(&self) -> &str {
        "Execute a Python program and return what it printed. Use print() to show results."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Complete Python source to run"
                }
            },
            "required": ["code"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedExecutor(CodeExecutionResult);

    #[async_trait]
    impl CodeExecutor for CannedExecutor {
        async fn execute(&self, _source: &str) -> Result<CodeExecutionResult> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_extract_code_blocks() {
        let text = "Let me compute.\n```python\nprint(500 * 0.93)\n```\nand\n```\nx = 1\n```\n\
                    but not\n```json\n{\"a\": 1}\n```";
        let blocks = extract_code_blocks(text);
        assert_eq!(blocks, vec!["print(500 * 0.93)".to_string(), "x = 1".to_string()]);
    }

    #[test]
    fn test_extract_code_blocks_none() {
        assert!(extract_code_blocks("The answer is 465 EUR.").is_empty());
        assert!(extract_code_blocks("```python\n\n```").is_empty());
    }

    #[tokio::test]
    async fn test_tool_reports_success() {
        let tool = CodeExecutionTool::new(Arc::new(CannedExecutor(CodeExecutionResult {
            stdout: "465.0\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })));

        let result = tool
            .execute(json!({"code": "print(465.0)"}), &RunContext::default())
            .await
            .unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(result["stdout"], "465.0\n");
        assert_eq!(result["exit_code"], 0);
    }

    #[tokio::test]
    async fn test_tool_reports_failure() {
        let tool = CodeExecutionTool::new(Arc::new(CannedExecutor(CodeExecutionResult {
            stdout: String::new(),
            stderr: "NameError: name 'y' is not defined\n".to_string(),
            exit_code: Some(1),
        })));

        let result = tool
            .execute(json!({"code": "print(y)"}), &RunContext::default())
            .await
            .unwrap();

        let outcome = ToolOutcome::from_value(&result).unwrap();
        assert!(outcome.is_error());
        assert!(outcome.error_message().unwrap().contains("NameError"));
    }

    #[tokio::test]
    async fn test_disabled_executor_reports_error_outcome() {
        let err = DisabledCodeExecutor.execute("print(1)").await.unwrap_err();
        assert!(err.is_recoverable());

        let tool = CodeExecutionTool::new(Arc::new(DisabledCodeExecutor));
        let result = tool
            .execute(json!({"code": "print(1)"}), &RunContext::default())
            .await
            .unwrap();
        let outcome = ToolOutcome::from_value(&result).unwrap();
        assert!(outcome.error_message().unwrap().contains("code execution disabled"));
    }

    struct HangingExecutor;

    #[async_trait]
    impl CodeExecutor for HangingExecutor {
        async fn execute(&self, _source: &str) -> Result<CodeExecutionResult> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancelled_run_stops_tool() {
        let tool = CodeExecutionTool::new(Arc::new(HangingExecutor));
        let token = agent_core::CancellationToken::new();
        let ctx = RunContext::default().with_cancellation(token.clone());
        token.cancel();

        let err = tool
            .execute(json!({"code": "while True: pass"}), &ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_missing_program_is_tool_error() {
        let executor = ProcessCodeExecutor::new("definitely-not-a-real-interpreter", ["-c"]);
        let err = executor.execute("print(1)").await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
