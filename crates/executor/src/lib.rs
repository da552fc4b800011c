//! Script execution for ScriptPilot.
//!
//! A confirmed script is written to a uniquely named file, run by the
//! configured interpreter as a child process, and the file is removed again
//! whatever happens. Failures never escape as errors: they come back as an
//! [`ExecutionOutcome`](scriptpilot_core::ExecutionOutcome) with exit code 1.

pub mod artifact;
pub mod script;

pub use artifact::ScriptArtifact;
pub use script::ScriptExecutor;
