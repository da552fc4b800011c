//! The interactive session.

use crate::terminal::TerminalConsole;
use colored::Colorize;
use scriptpilot_agent::{ModelClient, Session};
use scriptpilot_config::{AppConfig, FileSettingsStore, SettingsStore};
use scriptpilot_executor::ScriptExecutor;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

pub async fn run(store: Arc<FileSettingsStore>) -> ExitCode {
    let config = match store.load().filter(is_usable) {
        Some(config) => config,
        None => match super::setup::prompt(&store).await {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", format!("Setup failed: {e}").red());
                return ExitCode::FAILURE;
            }
        },
    };

    let model = match ModelClient::configure(&config) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            eprintln!("Run `scriptpilot --reconfigure` to change the settings.");
            return ExitCode::FAILURE;
        }
    };
    info!(provider = model.provider_name(), model = model.model(), "Model ready");

    let runner = Arc::new(ScriptExecutor::from_config(&config.executor));
    let archive = scriptpilot_archive::build_from_config(&config);
    let mut session = Session::new(
        model,
        Box::new(TerminalConsole::new()),
        runner,
        archive,
        store,
    );

    tokio::select! {
        end = session.run() => {
            info!(?end, "Session ended");
            ExitCode::SUCCESS
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n{}", "Goodbye!".yellow());
            // A pending stdin read would hold up runtime shutdown.
            std::process::exit(0);
        }
    }
}

/// Saved settings without a key for a hosted provider mean setup is needed.
fn is_usable(config: &AppConfig) -> bool {
    config.has_api_key() || !scriptpilot_providers::requires_api_key(&config.provider)
}

