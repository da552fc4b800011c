//! The ScriptPilot feedback loop.
//!
//! The session follows a **Request → Reply → Confirm → Execute** cycle:
//!
//! 1. **Receive** a request from the console
//! 2. **Compose** the prompt: the request plus the previous script's output
//! 3. **Ask** the model, keeping the conversation history
//! 4. **Parse** the reply: plain text, or a fenced script with reasoning
//! 5. **Confirm** the script with the user, then **execute** it
//!
//! The outcome of step 5 (or a sentinel when nothing ran) becomes the context
//! of the next request.

pub mod console;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use console::{Console, SessionEvent};
pub use model::ModelClient;
pub use parser::{Reply, parse_reply};
pub use session::{Command, Session, SessionEnd, SessionState, Turn, repl_prompt};
