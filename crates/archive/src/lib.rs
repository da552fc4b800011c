//! Directory archive: one folder per executed turn.
//!
//! Layout under the archive root:
//!
//! ```text
//! agent_archive/
//!   20240101_120000/
//!     prompt.txt
//!     reasoning_and_code.py
//!     output.log
//!   20240101_120000_2/
//!     ...
//! ```
//!
//! Plain files, readable with any editor. Nothing here is ever read back by
//! the assistant.

use scriptpilot_config::AppConfig;
use scriptpilot_core::archive::{ArchiveEntry, ArchiveSink, NullArchive};
use scriptpilot_core::error::ArchiveError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const PROMPT_FILE: &str = "prompt.txt";
const OUTPUT_FILE: &str = "output.log";

/// Writes each [`ArchiveEntry`] into a fresh timestamped folder.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
    extension: String,
}

impl DirectoryArchive {
    /// `extension` names the code file, e.g. `py` gives `reasoning_and_code.py`.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Write `entry` and return the folder it went into.
    pub fn try_record(&self, entry: &ArchiveEntry) -> Result<PathBuf, ArchiveError> {
        std::fs::create_dir_all(&self.root).map_err(|e| ArchiveError::CreateDir {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        let folder = self.claim_folder(entry)?;

        write_file(&folder.join(PROMPT_FILE), &entry.request)?;
        write_file(&folder.join(self.code_file_name()), &code_file_contents(entry))?;
        write_file(&folder.join(OUTPUT_FILE), &output_log_contents(entry))?;

        Ok(folder)
    }

    fn code_file_name(&self) -> String {
        if self.extension.is_empty() {
            "reasoning_and_code".to_string()
        } else {
            format!("reasoning_and_code.{}", self.extension)
        }
    }

    /// Create the entry's folder, adding `_2`, `_3`, ... until the name is free.
    fn claim_folder(&self, entry: &ArchiveEntry) -> Result<PathBuf, ArchiveError> {
        let stamp = entry.recorded_at.format("%Y%m%d_%H%M%S").to_string();

        let mut attempt = 1u32;
        loop {
            let name = if attempt == 1 {
                stamp.clone()
            } else {
                format!("{stamp}_{attempt}")
            };
            let folder = self.root.join(name);

            match std::fs::create_dir(&folder) {
                Ok(()) => return Ok(folder),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(ArchiveError::CreateDir {
                        path: folder,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

impl ArchiveSink for DirectoryArchive {
    fn record(&self, entry: &ArchiveEntry) -> Option<PathBuf> {
        match self.try_record(entry) {
            Ok(folder) => {
                info!(path = %folder.display(), "Interaction archived");
                Some(folder)
            }
            Err(e) => {
                warn!(error = %e, "Could not archive interaction");
                None
            }
        }
    }
}

/// Pick the sink for the `[archive]` section of the configuration.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn ArchiveSink> {
    if config.archive.enabled {
        Arc::new(DirectoryArchive::new(
            &config.archive.dir,
            &config.executor.extension,
        ))
    } else {
        Arc::new(NullArchive)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ArchiveError> {
    std::fs::write(path, contents).map_err(|e| ArchiveError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn code_file_contents(entry: &ArchiveEntry) -> String {
    match entry.reasoning.as_deref() {
        Some(reasoning) => format!("'''\n{reasoning}\n'''\n\n{}\n", entry.code),
        None => format!("{}\n", entry.code),
    }
}

fn output_log_contents(entry: &ArchiveEntry) -> String {
    format!(
        "--- STDOUT ---\n{}\n\n--- STDERR ---\n{}\n\n--- EXIT CODE ---\n{}\n",
        entry.stdout, entry.stderr, entry.exit_code
    )
}
