//! Interactive first-run setup.
//!
//! Asks for an API key and a model, keeping every other setting of the
//! configuration it starts from.

use crate::{AppConfig, ConfigError};
use std::io::{BufRead, Write};

/// A selectable provider/model pair offered by the wizard.
#[derive(Debug, Clone, Copy)]
pub struct ModelPreset {
    pub label: &'static str,
    pub provider: &'static str,
    pub model: &'static str,
}

pub const MODEL_PRESETS: &[ModelPreset] = &[
    ModelPreset {
        label: "Gemini 2.5 Flash (faster, good for everyday tasks)",
        provider: "gemini",
        model: "gemini-2.5-flash",
    },
    ModelPreset {
        label: "Gemini 2.5 Pro (stronger, for complex tasks)",
        provider: "gemini",
        model: "gemini-2.5-pro",
    },
];

pub struct SetupWizard {
    base: AppConfig,
}

impl SetupWizard {
    pub fn new(base: AppConfig) -> Self {
        Self { base }
    }

    /// Run the questions and return the new settings.
    ///
    /// The model choice is read from `input`. The API key goes through
    /// `read_key`, which shows its own prompt and must not echo the answer;
    /// the key is never written to `output`.
    ///
    /// Fails only if the input ends before both answers are given.
    pub fn run<R, W, K>(
        self,
        input: &mut R,
        output: &mut W,
        mut read_key: K,
    ) -> Result<AppConfig, ConfigError>
    where
        R: BufRead,
        W: Write,
        K: FnMut(&str) -> std::io::Result<String>,
    {
        let mut config = self.base;
        let io_err = |e: std::io::Error| ConfigError::SetupAborted(e.to_string());

        writeln!(output, "\n--- ScriptPilot setup ---").map_err(io_err)?;
        writeln!(
            output,
            "An API key is required. For Gemini, create one at https://aistudio.google.com/app/apikey"
        )
        .map_err(io_err)?;
        writeln!(output, "The key is not shown while you type it.").map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let api_key = loop {
            let answer = read_key("API key: ").map_err(io_err)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                break answer.to_string();
            }
        };

        writeln!(output, "\nWhich model would you like to use?").map_err(io_err)?;
        for (i, preset) in MODEL_PRESETS.iter().enumerate() {
            writeln!(output, "{}: {}", i + 1, preset.label).map_err(io_err)?;
        }

        let preset = loop {
            let answer = ask(input, output, &format!("Choice (1-{}): ", MODEL_PRESETS.len()))?;
            let picked = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| MODEL_PRESETS.get(i));
            if let Some(preset) = picked {
                break preset;
            }
        };

        config.api_key = Some(api_key);
        config.provider = preset.provider.into();
        config.model = preset.model.into();
        Ok(config)
    }
}

/// Print `prompt` and read one trimmed line.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, ConfigError> {
    let io_err = |e: std::io::Error| ConfigError::SetupAborted(e.to_string());

    write!(output, "{prompt}").map_err(io_err)?;
    output.flush().map_err(io_err)?;

    let mut line = String::new();
    if input.read_line(&mut line).map_err(io_err)? == 0 {
        return Err(ConfigError::SetupAborted("input closed".into()));
    }
    Ok(line.trim().to_string())
}
