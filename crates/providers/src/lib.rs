//! LLM Provider implementations for ScriptPilot.
//!
//! All providers implement the `scriptpilot_core::Provider` trait.
//! The router builds the configured provider from `AppConfig`.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_from_config, default_base_url, requires_api_key};
