//! Error types for slide compilation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a template or compiling a deck.
///
/// Everything downstream of a successful template load and generation call
/// degrades through fallbacks instead of failing, so the layout and slide
/// range variants only surface from misbehaving template stores.
#[derive(Error, Debug)]
pub enum Error {
    /// The template could not be read or is structurally unusable.
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// The content generation service failed.
    #[error("Content generation failed: {0}")]
    Generation(String),

    /// A layout index does not exist in the template.
    #[error("Layout index {index} out of range ({count} layouts)")]
    LayoutOutOfRange { index: usize, count: usize },

    /// A slide index does not exist in the deck.
    #[error("Slide index {index} out of range ({count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the compiled deck.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
