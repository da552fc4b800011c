//! Colored terminal console.

use async_trait::async_trait;
use colored::Colorize;
use scriptpilot_agent::{Console, SessionEvent};
use std::io::{BufRead, Write};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Reads stdin on the blocking pool so Ctrl+C is never stuck behind a read.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("\n{} ", prompt.trim_end().bold());
        std::io::stdout().flush()?;

        tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line)? {
                0 => Ok(None),
                _ => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            }
        })
        .await
        .map_err(std::io::Error::other)?
    }

    fn render(&mut self, event: &SessionEvent) {
        if matches!(event, SessionEvent::HistoryCleared) {
            print!("{CLEAR_SCREEN}");
        }
        println!("{}", format_event(event));
    }
}

fn format_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Welcome { model } => format!(
            "{}\nDescribe a task and I will prepare a plan and a script for it.\nType {} for internal commands.\nModel {} is ready.",
            "--- Welcome to ScriptPilot ---".cyan().bold(),
            "/help".blue(),
            model.bold()
        ),
        SessionEvent::Help => format!(
            "\n{}\n  {}           show this help\n  {}    set the API key and model again\n  {}            show the current directory\n  {}          forget the conversation so far\n  {}    leave ScriptPilot",
            "Internal commands:".bold(),
            "/help".blue(),
            "/reconfigure".blue(),
            "/cwd".blue(),
            "/clear".blue(),
            "/exit, /quit".blue()
        ),
        SessionEvent::WorkingDirectory(dir) => {
            format!("Current directory: {}", dir.display()).blue().to_string()
        }
        SessionEvent::HistoryCleared => "Conversation history cleared.".green().to_string(),
        SessionEvent::Reconfigured { model } => {
            format!("Settings updated, now using {model}.").green().to_string()
        }
        SessionEvent::Warning(message) => message.yellow().to_string(),
        SessionEvent::Error(message) => message.red().to_string(),
        SessionEvent::Thinking => "ScriptPilot is thinking...".blue().to_string(),
        SessionEvent::Reply(text) => format!("\n{}", format!("ScriptPilot: {text}").blue()),
        SessionEvent::ActionPlan { reasoning, code } => {
            let mut out = format!("\n{}", "Action plan:".cyan().bold());
            if let Some(reasoning) = reasoning {
                out.push_str(&format!("\n{}\n{reasoning}", "Reasoning:".bold()));
            }
            out.push_str(&format!("\n\n{}\n{}", "Proposed script:".bold(), code.green()));
            out
        }
        SessionEvent::Declined => "Cancelled, nothing was run.".yellow().to_string(),
        SessionEvent::Executing => format!("\n{}", "Running script...".blue()),
        SessionEvent::Outcome(outcome) => {
            let stdout = if outcome.stdout.is_empty() {
                "[empty]"
            } else {
                outcome.stdout.trim_end()
            };
            let mut out = format!("\n{}\n{stdout}", "--- STDOUT ---".bold());
            if !outcome.stderr.is_empty() {
                out.push_str(&format!(
                    "\n\n{}\n{}",
                    "--- STDERR ---".red().bold(),
                    outcome.stderr.trim_end().red()
                ));
            }
            let status = format!("Script finished (exit code {}).", outcome.exit_code);
            let status = if outcome.success() {
                status.green()
            } else {
                status.red()
            };
            out.push_str(&format!("\n{status}"));
            out
        }
        SessionEvent::Archived(path) => format!("Saved to {}", path.display())
            .dimmed()
            .to_string(),
        SessionEvent::Goodbye => format!("\n{}", "Goodbye!".yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptpilot_core::outcome::ExecutionOutcome;

    fn plain(event: &SessionEvent) -> String {
        colored::control::set_override(false);
        format_event(event)
    }

    #[test]
    fn empty_stdout_is_marked() {
        let text = plain(&SessionEvent::Outcome(ExecutionOutcome::new("", "", 0)));
        assert!(text.contains("--- STDOUT ---\n[empty]"));
        assert!(!text.contains("STDERR"));
        assert!(text.contains("exit code 0"));
    }

    #[test]
    fn stderr_shown_when_present() {
        let text = plain(&SessionEvent::Outcome(ExecutionOutcome::new(
            "partial\n",
            "boom\n",
            3,
        )));
        assert!(text.contains("partial"));
        assert!(text.contains("--- STDERR ---\nboom"));
        assert!(text.contains("exit code 3"));
    }

    #[test]
    fn plan_without_reasoning_has_no_reasoning_header() {
        let text = plain(&SessionEvent::ActionPlan {
            reasoning: None,
            code: "print(1)".into(),
        });
        assert!(!text.contains("Reasoning:"));
        assert!(text.ends_with("Proposed script:\nprint(1)"));

        let text = plain(&SessionEvent::ActionPlan {
            reasoning: Some("Count to one.".into()),
            code: "print(1)".into(),
        });
        assert!(text.contains("Reasoning:\nCount to one."));
    }

    #[test]
    fn help_lists_every_command() {
        let text = plain(&SessionEvent::Help);
        for command in ["/help", "/reconfigure", "/cwd", "/clear", "/exit", "/quit"] {
            assert!(text.contains(command), "missing {command}");
        }
    }

    #[test]
    fn welcome_names_model() {
        let text = plain(&SessionEvent::Welcome {
            model: "gemini-2.5-flash".into(),
        });
        assert!(text.contains("gemini-2.5-flash"));
        assert!(text.contains("/help"));
    }
}
