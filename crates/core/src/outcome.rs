//! Execution outcomes and the script-runner seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The result of running one confirmed script.
///
/// Produced exactly once per execution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionOutcome {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// An outcome standing in for a script that never got to run.
    pub fn launch_failure(reason: impl std::fmt::Display) -> Self {
        Self::new("", format!("Script execution error: {reason}"), 1)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Text form fed back to the model as the previous command's output.
    pub fn as_context(&self) -> String {
        format!(
            "STDOUT:\n{}\n\nSTDERR:\n{}\n\nEXIT CODE: {}",
            self.stdout, self.stderr, self.exit_code
        )
    }
}

/// Runs generated code and reports what happened.
///
/// Implementations must not fail: anything that goes wrong while preparing or
/// launching the script is reported through the returned outcome.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn execute_script(&self, code: &str) -> ExecutionOutcome;
}
