//! The session controller: the request/response/execution feedback loop.
//!
//! Each turn follows the same path:
//!
//! 1. **Idle**: read a line; internal commands are handled here
//! 2. **Dispatching**: send the request plus the last outcome to the model
//! 3. **Reviewing**: show a proposed script and ask for confirmation
//! 4. **Executing**: run the confirmed script
//! 5. **Reporting**: fold the outcome (or a sentinel) into the next prompt
//!
//! A plain-text reply skips straight from Dispatching to Reporting.

use crate::console::{Console, SessionEvent};
use crate::model::ModelClient;
use crate::parser::{Reply, parse_reply};
use crate::prompt::{CONVERSATION_ONLY, NO_PRIOR_OUTPUT, USER_DECLINED, compose_prompt};
use chrono::Local;
use scriptpilot_config::SettingsStore;
use scriptpilot_core::archive::{ArchiveEntry, ArchiveSink};
use scriptpilot_core::message::History;
use scriptpilot_core::outcome::{ExecutionOutcome, ScriptRunner};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, warn};

const CONFIRM_PROMPT: &str = "Run this script? [y/N]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Dispatching,
    Reviewing,
    Executing,
    Reporting,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/exit`, `/quit`, `exit` or `quit`
    Quit,
    /// End of input, including during a confirmation prompt
    InputClosed,
}

/// Commands handled by the session itself; they never reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Reconfigure,
    Cwd,
    Clear,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "/help" => Some(Self::Help),
            "/reconfigure" => Some(Self::Reconfigure),
            "/cwd" => Some(Self::Cwd),
            "/clear" => Some(Self::Clear),
            "/exit" | "/quit" | "exit" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Everything that happened in one turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub request: String,
    /// Context the request was sent with
    pub prior_outcome: String,
    /// `None` when the model call failed
    pub raw_reply: Option<String>,
    pub reply: Reply,
    pub confirmed: bool,
    pub outcome: Option<ExecutionOutcome>,
}

/// One interactive session: owns the history and the last outcome.
pub struct Session {
    model: ModelClient,
    console: Box<dyn Console>,
    runner: Arc<dyn ScriptRunner>,
    archive: Arc<dyn ArchiveSink>,
    settings: Arc<dyn SettingsStore>,
    history: History,
    context: String,
    state: SessionState,
}

impl Session {
    pub fn new(
        model: ModelClient,
        console: Box<dyn Console>,
        runner: Arc<dyn ScriptRunner>,
        archive: Arc<dyn ArchiveSink>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            model,
            console,
            runner,
            archive,
            settings,
            history: History::new(),
            context: NO_PRIOR_OUTPUT.to_string(),
            state: SessionState::Idle,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The text the next request will be sent with.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &ModelClient {
        &self.model
    }

    /// Run until the user quits or the input closes.
    pub async fn run(&mut self) -> SessionEnd {
        self.console.render(&SessionEvent::Welcome {
            model: self.model.model().to_string(),
        });

        let end = loop {
            let line = match self.console.read_line(&repl_prompt()).await {
                Ok(Some(line)) => line,
                Ok(None) => break SessionEnd::InputClosed,
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break SessionEnd::InputClosed;
                }
            };

            if let ControlFlow::Break(end) = self.handle_line(&line).await {
                break end;
            }
        };

        debug!(?end, "Session finished");
        self.console.render(&SessionEvent::Goodbye);
        end
    }

    /// Handle one line of input. Returns the turn when the model was asked.
    pub async fn handle_line(&mut self, line: &str) -> ControlFlow<SessionEnd, Option<Turn>> {
        let line = line.trim();
        if line.is_empty() {
            return ControlFlow::Continue(None);
        }

        if let Some(command) = Command::parse(line) {
            return match self.run_command(command).await {
                ControlFlow::Break(end) => ControlFlow::Break(end),
                ControlFlow::Continue(()) => ControlFlow::Continue(None),
            };
        }

        match self.turn(line).await {
            ControlFlow::Break(end) => ControlFlow::Break(end),
            ControlFlow::Continue(turn) => ControlFlow::Continue(Some(turn)),
        }
    }

    /// Run one full turn for a request that is not an internal command.
    pub async fn turn(&mut self, request: &str) -> ControlFlow<SessionEnd, Turn> {
        self.transition(SessionState::Dispatching);

        let prior_outcome = self.context.clone();
        let prompt = compose_prompt(request, &prior_outcome);

        self.console.render(&SessionEvent::Thinking);
        let (raw_reply, reply) = match self.model.converse(&prompt, &mut self.history).await {
            Ok(raw) => {
                let reply = parse_reply(&raw);
                (Some(raw), reply)
            }
            Err(e) => {
                warn!(error = %e, "Model call failed");
                let message = format!("The model call failed: {e}");
                self.console.render(&SessionEvent::Error(message.clone()));
                (None, Reply::Text(message))
            }
        };

        let mut turn = Turn {
            request: request.to_string(),
            prior_outcome,
            raw_reply,
            reply,
            confirmed: false,
            outcome: None,
        };

        let (reasoning, code) = match turn.reply.clone() {
            Reply::Text(text) => {
                if turn.raw_reply.is_some() {
                    self.console.render(&SessionEvent::Reply(text));
                }
                self.transition(SessionState::Reporting);
                self.context = CONVERSATION_ONLY.to_string();
                self.transition(SessionState::Idle);
                return ControlFlow::Continue(turn);
            }
            Reply::Action { reasoning, code } => (reasoning, code),
        };

        self.transition(SessionState::Reviewing);
        self.console.render(&SessionEvent::ActionPlan {
            reasoning: reasoning.clone(),
            code: code.clone(),
        });

        let answer = match self.console.read_line(CONFIRM_PROMPT).await {
            Ok(Some(answer)) => answer,
            Ok(None) => return ControlFlow::Break(SessionEnd::InputClosed),
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation");
                return ControlFlow::Break(SessionEnd::InputClosed);
            }
        };
        turn.confirmed = answer.trim().eq_ignore_ascii_case("y");

        if !turn.confirmed {
            self.console.render(&SessionEvent::Declined);
            self.transition(SessionState::Reporting);
            self.context = USER_DECLINED.to_string();
            self.transition(SessionState::Idle);
            return ControlFlow::Continue(turn);
        }

        self.transition(SessionState::Executing);
        self.console.render(&SessionEvent::Executing);
        let outcome = self.runner.execute_script(&code).await;

        self.transition(SessionState::Reporting);
        self.console.render(&SessionEvent::Outcome(outcome.clone()));
        self.context = outcome.as_context();

        let entry = ArchiveEntry {
            request: request.to_string(),
            reasoning,
            code,
            stdout: outcome.stdout.clone(),
            stderr: outcome.stderr.clone(),
            exit_code: outcome.exit_code,
            recorded_at: Local::now(),
        };
        if let Some(path) = self.archive.record(&entry) {
            self.console.render(&SessionEvent::Archived(path));
        }

        turn.outcome = Some(outcome);
        self.transition(SessionState::Idle);
        ControlFlow::Continue(turn)
    }

    async fn run_command(&mut self, command: Command) -> ControlFlow<SessionEnd> {
        debug!(?command, "Internal command");

        match command {
            Command::Quit => return ControlFlow::Break(SessionEnd::Quit),
            Command::Help => self.console.render(&SessionEvent::Help),
            Command::Cwd => match std::env::current_dir() {
                Ok(dir) => self.console.render(&SessionEvent::WorkingDirectory(dir)),
                Err(e) => self.console.render(&SessionEvent::Warning(format!(
                    "Cannot determine the current directory: {e}"
                ))),
            },
            Command::Clear => {
                self.history.clear();
                self.console.render(&SessionEvent::HistoryCleared);
                self.console.render(&SessionEvent::Welcome {
                    model: self.model.model().to_string(),
                });
            }
            Command::Reconfigure => self.reconfigure().await,
        }

        ControlFlow::Continue(())
    }

    /// Run the setup flow and swap in the new model. History is kept.
    async fn reconfigure(&mut self) {
        let settings = Arc::clone(&self.settings);
        let result =
            tokio::task::spawn_blocking(move || settings.interactive_prompt_and_save()).await;

        let config = match result {
            Ok(Ok(config)) => config,
            Ok(Err(e)) => {
                self.console
                    .render(&SessionEvent::Warning(format!("Setup failed: {e}")));
                return;
            }
            Err(e) => {
                self.console
                    .render(&SessionEvent::Warning(format!("Setup was interrupted: {e}")));
                return;
            }
        };

        match ModelClient::configure(&config) {
            Ok(client) => {
                self.model = client;
                self.console.render(&SessionEvent::Reconfigured {
                    model: self.model.model().to_string(),
                });
            }
            Err(e) => self.console.render(&SessionEvent::Warning(format!(
                "{e}; still using {}",
                self.model.model()
            ))),
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state change");
        self.state = next;
    }
}

/// `(<dir>) scriptpilot > ` with the current directory's name.
pub fn repl_prompt() -> String {
    let dir = std::env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "/".to_string());
    format!("({dir}) scriptpilot > ")
}
