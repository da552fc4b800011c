//! Provider selection: builds the configured LLM backend.

use crate::openai_compat::OpenAiCompatProvider;
use scriptpilot_config::AppConfig;
use scriptpilot_core::error::ProviderError;
use scriptpilot_core::provider::Provider;
use std::sync::Arc;

/// Build the provider named in the configuration.
///
/// Fails when the provider needs a key and none is configured, or when the
/// provider is unknown and no `api_url` was given.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.trim();

    let base_url = config
        .api_url
        .clone()
        .or_else(|| default_base_url(name).map(String::from))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{name}'; set api_url in the configuration"
            ))
        })?;

    let api_key = match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ if requires_api_key(name) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key configured for '{name}'"
            )));
        }
        _ => name.to_string(),
    };

    Ok(Arc::new(OpenAiCompatProvider::new(name, &base_url, &api_key)))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "gemini" => "https://generativelanguage.googleapis.com/v1beta/openai",
        "openrouter" => "https://openrouter.ai/api/v1",
        "openai" => "https://api.openai.com/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url)
}

/// Local servers accept any bearer token.
pub fn requires_api_key(provider_name: &str) -> bool {
    !matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}
