//! Data model
//!
//! Client settings, typed resource sections and the outcome vocabulary
//! shared by the validator, the handlers and the orchestrator.

mod client;
mod section;
mod status;

// Re-exports
pub use client::*;
pub use section::*;
pub use status::*;
