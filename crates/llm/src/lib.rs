//! Content generation through OpenAI-compatible chat completion endpoints.
//!
//! Configuration is an explicit [`GenerationConfig`] value; each client is
//! built from one and holds no shared state, so runs against different
//! providers can proceed side by side.

pub mod client;
pub mod config;
pub mod error;

pub use client::ChatClient;
pub use config::{GenerationConfig, Provider, ResolvedConfig};
pub use error::LlmError;
