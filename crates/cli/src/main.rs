//! ScriptPilot CLI entry point.
//!
//! Starts the interactive session, or with `--reconfigure` only runs the
//! setup questions and exits.

use clap::Parser;
use scriptpilot_config::{AppConfig, FileSettingsStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(
    name = "scriptpilot",
    about = "ScriptPilot: describe a task, review the generated script, run it",
    version
)]
struct Cli {
    /// Set the API key and model again, then exit
    #[arg(long)]
    reconfigure: bool,

    /// Settings file to use instead of ~/.config/scriptpilot/config.toml
    #[arg(long, value_name = "PATH", env = "SCRIPTPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the session on stdout.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let path = cli.config.unwrap_or_else(AppConfig::default_path);
    let store = Arc::new(FileSettingsStore::new(path));

    if cli.reconfigure {
        return commands::setup::run(&store).await;
    }

    commands::chat::run(store).await
}
