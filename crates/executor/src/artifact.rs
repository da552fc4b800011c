//! The transient on-disk copy of a script.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A script file that deletes itself when dropped.
///
/// Owning the file through this guard ties its lifetime to a scope, so every
/// exit path of an execution (including early returns and panics) removes it.
#[derive(Debug)]
pub struct ScriptArtifact {
    path: PathBuf,
}

impl ScriptArtifact {
    /// Write `code` to a fresh `scriptpilot-<uuid>.<extension>` file in `dir`.
    pub fn create(dir: &Path, extension: &str, code: &str) -> io::Result<Self> {
        let name = if extension.is_empty() {
            format!("scriptpilot-{}", Uuid::new_v4())
        } else {
            format!("scriptpilot-{}.{extension}", Uuid::new_v4())
        };
        let path = dir.join(name);

        // Guard first so a partially written file is still cleaned up.
        let artifact = Self { path };
        std::fs::write(&artifact.path, code)?;
        debug!(path = %artifact.path.display(), bytes = code.len(), "Script artifact written");
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScriptArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Script artifact removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove script artifact"),
        }
    }
}
