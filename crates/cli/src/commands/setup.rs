//! `scriptpilot --reconfigure` and the first-run setup.

use colored::Colorize;
use scriptpilot_config::{AppConfig, ConfigError, FileSettingsStore, SettingsStore};
use std::process::ExitCode;
use std::sync::Arc;

/// Ask for new settings and save them.
pub async fn prompt(store: &Arc<FileSettingsStore>) -> Result<AppConfig, ConfigError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || store.interactive_prompt_and_save())
        .await
        .map_err(|e| ConfigError::SetupAborted(e.to_string()))?
}

/// Run setup and exit without starting a session.
pub async fn run(store: &Arc<FileSettingsStore>) -> ExitCode {
    match prompt(store).await {
        Ok(config) => {
            println!(
                "{}",
                format!(
                    "Settings saved to {} (model {}).",
                    store.path().display(),
                    config.model
                )
                .green()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", format!("Setup failed: {e}").red());
            ExitCode::FAILURE
        }
    }
}
