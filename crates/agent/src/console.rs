//! Console seam between the session and the terminal.

use async_trait::async_trait;
use scriptpilot_core::outcome::ExecutionOutcome;
use std::path::PathBuf;

/// Everything the session wants shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Start-up banner, also redrawn by `/clear`.
    Welcome { model: String },
    Help,
    WorkingDirectory(PathBuf),
    HistoryCleared,
    Reconfigured { model: String },
    Warning(String),
    Error(String),
    /// The model call is in flight.
    Thinking,
    /// A talk-only reply.
    Reply(String),
    /// A script proposal; a confirmation prompt follows.
    ActionPlan {
        reasoning: Option<String>,
        code: String,
    },
    Declined,
    Executing,
    Outcome(ExecutionOutcome),
    Archived(PathBuf),
    Goodbye,
}

/// Line-oriented user I/O.
///
/// The session never touches stdin or stdout itself; a terminal console and
/// a scripted test console both implement this.
#[async_trait]
pub trait Console: Send {
    /// Show `prompt` and read one line. `Ok(None)` means the input is closed.
    async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;

    fn render(&mut self, event: &SessionEvent);
}
