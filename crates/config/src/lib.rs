//! Configuration loading, validation, and management for ScriptPilot.
//!
//! Loads configuration from `~/.config/scriptpilot/config.toml` with
//! environment variable overrides. When nothing usable is found the binary
//! falls back to the interactive [`SetupWizard`].

pub mod wizard;

pub use wizard::{MODEL_PRESETS, ModelPreset, SetupWizard};

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Replace the built-in system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,

    /// How generated scripts are run
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Where executed turns are archived
    #[serde(default)]
    pub archive: ArchiveConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt_override", &self.system_prompt_override)
            .field("executor", &self.executor)
            .field("archive", &self.archive)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Interpreter binary for generated scripts
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// File extension of the transient script artifact
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory for transient script artifacts (defaults to the OS temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

fn default_interpreter() -> String {
    "python3".into()
}
fn default_extension() -> String {
    "py".into()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            extension: default_extension(),
            work_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Archive root; relative paths resolve against the working directory
    #[serde(default = "default_archive_dir")]
    pub dir: PathBuf,
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("agent_archive")
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_archive_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific file path.
    ///
    /// A missing file is not an error: it yields `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(Some(config))
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(format!("cannot serialize config: {e}")))?;

        let mut file = open_private(path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        Ok(())
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    ///
    /// - `SCRIPTPILOT_API_KEY`, then `GEMINI_API_KEY`: only when no key is set
    /// - `SCRIPTPILOT_PROVIDER`, `SCRIPTPILOT_MODEL`: always win
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("SCRIPTPILOT_API_KEY").or_else(|| lookup("GEMINI_API_KEY"));
        }

        if let Some(provider) = lookup("SCRIPTPILOT_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("SCRIPTPILOT_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    ///
    /// Honors `XDG_CONFIG_HOME`, otherwise `~/.config/scriptpilot`.
    pub fn config_dir() -> PathBuf {
        match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("scriptpilot"),
            _ => dirs_home().join(".config").join("scriptpilot"),
        }
    }

    /// Default path of the configuration file.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.executor.interpreter.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "executor.interpreter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            api_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt_override: None,
            executor: ExecutorConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

/// The configuration collaborator used by the session.
///
/// Consulted once at startup and again on an explicit reconfigure.
pub trait SettingsStore: Send + Sync {
    /// Load saved settings; `None` when nothing usable exists.
    fn load(&self) -> Option<AppConfig>;

    /// Ask the user for fresh settings, persist them, and return them.
    fn interactive_prompt_and_save(&self) -> Result<AppConfig, ConfigError>;
}

/// Settings stored in a TOML file, set up interactively over stdin/stdout.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<AppConfig> {
        match AppConfig::load_from(&self.path) {
            Ok(Some(mut config)) => {
                config.apply_env_overrides(lookup);
                Some(config)
            }
            Ok(None) => {
                // No file, but a key in the environment is enough to start.
                let mut config = AppConfig::default();
                config.apply_env_overrides(lookup);
                config.has_api_key().then_some(config)
            }
            Err(e) => {
                tracing::warn!("{e}; new settings will be requested");
                None
            }
        }
    }

    /// Run the wizard over arbitrary I/O and save the result.
    ///
    /// `read_key` supplies the API key, see [`SetupWizard::run`].
    pub fn prompt_and_save_with<R, W, K>(
        &self,
        input: &mut R,
        output: &mut W,
        read_key: K,
    ) -> Result<AppConfig, ConfigError>
    where
        R: std::io::BufRead,
        W: std::io::Write,
        K: FnMut(&str) -> std::io::Result<String>,
    {
        // Keep whatever else the user already configured.
        let base = AppConfig::load_from(&self.path)
            .ok()
            .flatten()
            .unwrap_or_default();

        let config = SetupWizard::new(base).run(input, output, read_key)?;
        config.save_to(&self.path)?;
        tracing::info!(path = %self.path.display(), "Settings saved");
        Ok(config)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Option<AppConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    fn interactive_prompt_and_save(&self) -> Result<AppConfig, ConfigError> {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        // Reads from the controlling terminal with echo turned off.
        self.prompt_and_save_with(&mut input, &mut output, |prompt| {
            rpassword::prompt_password(prompt)
        })
    }
}

/// Open `path` for writing, readable by the owner only.
///
/// A new file is created with mode 0600. An existing file is narrowed to 0600
/// before it is truncated, so the key is never written into a wider file.
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.set_len(0)?;
        Ok(file)
    }

    #[cfg(not(unix))]
    {
        options.truncate(true).open(path)
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Setup aborted: {0}")]
    SetupAborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.executor.interpreter, "python3");
        assert!(config.archive.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.archive.dir, config.archive.dir);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn missing_config_file_is_absent() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_key = \"k\"\nmodel = \"gpt-4o-mini\"\nprovider = \"openai\"\n\n[executor]\ninterpreter = \"python\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.provider, "openai");
        assert_eq!(config.executor.interpreter, "python");
        assert_eq!(config.executor.extension, "py");
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            api_key: Some("k".into()),
            model: "gemini-2.5-pro".into(),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.model, "gemini-2.5-pro");
        assert_eq!(loaded.api_key.as_deref(), Some("k"));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            api_key: Some("k".into()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_wide_file_is_narrowed_and_replaced() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# a much longer leftover comment that must disappear\n".repeat(20))
            .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let config = AppConfig {
            api_key: Some("k".into()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("leftover"));
        assert_eq!(
            AppConfig::load_from(&path).unwrap().unwrap().api_key.as_deref(),
            Some("k")
        );
    }

    #[test]
    fn env_key_only_fills_missing_key() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[("GEMINI_API_KEY", "from-gemini")]));
        assert_eq!(config.api_key.as_deref(), Some("from-gemini"));

        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("SCRIPTPILOT_API_KEY", "from-env"),
            ("SCRIPTPILOT_MODEL", "gemini-2.5-pro"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn store_load_is_absent_without_file_or_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("config.toml"));
        assert!(store.load_with(env(&[])).is_none());

        let loaded = store
            .load_with(env(&[("SCRIPTPILOT_API_KEY", "k")]))
            .unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn store_load_treats_corrupt_file_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = FileSettingsStore::new(&path);
        assert!(store.load_with(env(&[])).is_none());
    }

    #[test]
    fn store_prompt_saves_wizard_answers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("config.toml"));

        let mut input = std::io::Cursor::new("2\n");
        let mut output = Vec::new();
        let config = store
            .prompt_and_save_with(&mut input, &mut output, |_| Ok("sk-abc".into()))
            .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(!String::from_utf8(output).unwrap().contains("sk-abc"));

        let reloaded = store.load_with(env(&[])).unwrap();
        assert_eq!(reloaded.api_key.as_deref(), Some("sk-abc"));
        assert_eq!(reloaded.model, "gemini-2.5-pro");
    }
}
