//! Archive sink, the best-effort record of executed turns.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything worth keeping about one confirmed and executed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// The user's request, as typed
    pub request: String,
    pub reasoning: Option<String>,
    pub code: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub recorded_at: DateTime<Local>,
}

/// Where archive entries go.
///
/// `record` is fire-and-forget: implementations swallow (and log) their own
/// failures. On success they may return the location that was written.
pub trait ArchiveSink: Send + Sync {
    fn record(&self, entry: &ArchiveEntry) -> Option<PathBuf>;
}

/// A sink that keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullArchive;

impl ArchiveSink for NullArchive {
    fn record(&self, _entry: &ArchiveEntry) -> Option<PathBuf> {
        None
    }
}
