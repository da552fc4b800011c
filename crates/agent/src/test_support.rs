//! Scripted stand-ins for the session's collaborators.

use crate::console::{Console, SessionEvent};
use async_trait::async_trait;
use scriptpilot_config::{AppConfig, ConfigError, SettingsStore};
use scriptpilot_core::archive::{ArchiveEntry, ArchiveSink};
use scriptpilot_core::error::ProviderError;
use scriptpilot_core::message::Message;
use scriptpilot_core::outcome::{ExecutionOutcome, ScriptRunner};
use scriptpilot_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A mock provider that returns a sequence of scripted results.
///
/// Panics if more calls are made than results provided.
pub struct SequentialMockProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(make_text_response(t))).collect())
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let call = requests.len();

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("SequentialMockProvider: no response for call #{call}"))
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Records every script and answers with a fixed outcome.
pub struct CountingRunner {
    outcome: ExecutionOutcome,
    scripts: Mutex<Vec<String>>,
}

impl CountingRunner {
    pub fn new(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            scripts: Mutex::new(Vec::new()),
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }
}

#[async_trait]
impl ScriptRunner for CountingRunner {
    async fn execute_script(&self, code: &str) -> ExecutionOutcome {
        self.scripts.lock().unwrap().push(code.to_string());
        self.outcome.clone()
    }
}

#[derive(Default)]
pub struct RecordingArchive {
    entries: Mutex<Vec<ArchiveEntry>>,
}

impl RecordingArchive {
    pub fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl ArchiveSink for RecordingArchive {
    fn record(&self, entry: &ArchiveEntry) -> Option<PathBuf> {
        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
        Some(PathBuf::from(format!("archive/{}", entries.len())))
    }
}

/// Hands out one prepared configuration per setup run.
#[derive(Default)]
pub struct StubSettings {
    next: Mutex<Option<AppConfig>>,
    calls: Mutex<usize>,
}

impl StubSettings {
    pub fn set_next(&self, config: AppConfig) {
        *self.next.lock().unwrap() = Some(config);
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl SettingsStore for StubSettings {
    fn load(&self) -> Option<AppConfig> {
        None
    }

    fn interactive_prompt_and_save(&self) -> Result<AppConfig, ConfigError> {
        *self.calls.lock().unwrap() += 1;
        self.next
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ConfigError::SetupAborted("input closed".into()))
    }
}

#[derive(Default)]
struct ConsoleState {
    inputs: VecDeque<String>,
    prompts: Vec<String>,
    events: Vec<SessionEvent>,
}

/// Feeds prepared lines and records everything rendered.
pub struct ScriptedConsole {
    state: Arc<Mutex<ConsoleState>>,
}

/// Test-side view of a [`ScriptedConsole`] owned by a session.
#[derive(Clone)]
pub struct ConsoleHandle {
    state: Arc<Mutex<ConsoleState>>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> (Self, ConsoleHandle) {
        let state = Arc::new(Mutex::new(ConsoleState {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..ConsoleState::default()
        }));
        (
            Self {
                state: state.clone(),
            },
            ConsoleHandle { state },
        )
    }
}

impl ConsoleHandle {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().prompts.clone()
    }

    /// Take the next scripted line, for tests that drive `handle_line` directly.
    pub fn next_input(&self) -> Option<String> {
        self.state.lock().unwrap().inputs.pop_front()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.prompts.push(prompt.to_string());
        Ok(state.inputs.pop_front())
    }

    fn render(&mut self, event: &SessionEvent) {
        self.state.lock().unwrap().events.push(event.clone());
    }
}
