//! Error types for the ScriptPilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the assistant from starting a session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Model initialization failed: {0}")]
    ModelInit(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to create archive directory {path}: {reason}")]
    CreateDir { path: PathBuf, reason: String },

    #[error("Failed to write archive file {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn archive_error_names_the_path() {
        let err = ArchiveError::Write {
            path: PathBuf::from("/archive/prompt.txt"),
            reason: "disk full".into(),
        };
        assert!(err.to_string().contains("prompt.txt"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn model_init_error_keeps_reason() {
        let err = Error::ModelInit("API key is missing".into());
        assert_eq!(err.to_string(), "Model initialization failed: API key is missing");
    }
}
