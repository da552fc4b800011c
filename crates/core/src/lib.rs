//! # ScriptPilot Core
//!
//! Domain types, collaborator traits, and error definitions shared by every
//! ScriptPilot crate. Nothing in here performs I/O.
//!
//! ## Collaborators
//!
//! The feedback loop talks to three outside parties, each behind a trait:
//! - [`Provider`]: the conversational model
//! - [`ScriptRunner`]: runs a generated script and reports its outcome
//! - [`ArchiveSink`]: best-effort record of every executed turn
//!
//! Implementations live in their own crates so the session controller can be
//! tested with scripted stand-ins.

pub mod archive;
pub mod error;
pub mod message;
pub mod outcome;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use archive::{ArchiveEntry, ArchiveSink, NullArchive};
pub use error::{ArchiveError, Error, ProviderError};
pub use message::{Exchange, History, Message, Role};
pub use outcome::{ExecutionOutcome, ScriptRunner};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
