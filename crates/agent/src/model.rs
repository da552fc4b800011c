//! Model client, the `generate(prompt, history) -> text` capability.

use crate::prompt::SYSTEM_PROMPT;
use scriptpilot_config::AppConfig;
use scriptpilot_core::error::{Error, ProviderError};
use scriptpilot_core::message::{History, Message};
use scriptpilot_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// A configured model: provider, model name and sampling settings.
///
/// Built once at startup and owned by the session. `/reconfigure` swaps it
/// for a freshly configured one.
pub struct ModelClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: String,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Build a client from the settings, or fail with [`Error::ModelInit`].
    pub fn configure(config: &AppConfig) -> Result<Self, Error> {
        let provider = scriptpilot_providers::build_from_config(config)
            .map_err(|e| Error::ModelInit(e.to_string()))?;

        let mut client = Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens);

        if let Some(prompt) = &config.system_prompt_override {
            client = client.with_system_prompt(prompt);
        }

        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `prompt` after the system prompt and `history`.
    ///
    /// On success the exchange is appended to `history`; on failure it is
    /// left untouched.
    pub async fn converse(
        &self,
        prompt: &str,
        history: &mut History,
    ) -> Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(history.messages().cloned());
        messages.push(Message::user(prompt));

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Model replied"
            );
        }

        let reply = response.message.content;
        history.push(prompt, reply.clone());
        Ok(reply)
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
