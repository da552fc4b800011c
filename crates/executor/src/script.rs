//! Runs generated code with the configured interpreter.

use crate::artifact::ScriptArtifact;
use async_trait::async_trait;
use scriptpilot_config::ExecutorConfig;
use scriptpilot_core::outcome::{ExecutionOutcome, ScriptRunner};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs one script at a time as a child process of the assistant.
///
/// No static analysis of the code happens here; the user's confirmation is
/// the only gate in front of it.
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    interpreter: String,
    extension: String,
    work_dir: PathBuf,
}

impl ScriptExecutor {
    /// Artifacts go to the OS temp dir unless [`with_work_dir`](Self::with_work_dir) is used.
    pub fn new(interpreter: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            extension: extension.into(),
            work_dir: std::env::temp_dir(),
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        let executor = Self::new(&config.interpreter, &config.extension);
        match &config.work_dir {
            Some(dir) => executor.with_work_dir(dir.clone()),
            None => executor,
        }
    }

    /// Directory that receives the transient script files.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}

#[async_trait]
impl ScriptRunner for ScriptExecutor {
    async fn execute_script(&self, code: &str) -> ExecutionOutcome {
        let artifact = match ScriptArtifact::create(&self.work_dir, &self.extension, code) {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(dir = %self.work_dir.display(), error = %e, "Could not write script file");
                return ExecutionOutcome::launch_failure(format!(
                    "could not write script file in {}: {e}",
                    self.work_dir.display()
                ));
            }
        };

        debug!(
            interpreter = %self.interpreter,
            path = %artifact.path().display(),
            "Executing script"
        );

        let output = Command::new(&self.interpreter)
            .arg(artifact.path())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        // The child is gone; the file can go too.
        drop(artifact);

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                // Killed by a signal: no exit code.
                let exit_code = output.status.code().unwrap_or(-1);

                if exit_code != 0 {
                    warn!(exit_code, "Script exited with a failure status");
                }

                ExecutionOutcome::new(stdout, stderr, exit_code)
            }
            Err(e) => {
                warn!(interpreter = %self.interpreter, error = %e, "Could not start interpreter");
                ExecutionOutcome::launch_failure(format!(
                    "could not start '{}': {e}",
                    self.interpreter
                ))
            }
        }
    }
}
