//! Error types for content generation.

use thiserror::Error;

/// Errors that can occur while calling a generation provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The configuration cannot be used to build a client.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The request could not be sent or the response not read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with something other than a completion.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
