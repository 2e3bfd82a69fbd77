//! Slide compilation engine.
//!
//! Turns a markdown-like slide script into slides built from the layouts of
//! a user-supplied template: layouts are resolved by fuzzy name matching,
//! capacity constraints are inferred from placeholder geometry, and bullet
//! content is placed into the best body placeholder with bold runs.

pub mod capacity;
pub mod compile;
pub mod error;
pub mod generate;
pub mod inline;
pub mod place;
pub mod prompt;
pub mod resolve;
pub mod script;
pub mod template;
pub mod types;

pub use capacity::{build_constraints, estimate_capacity, LayoutConstraints};
pub use compile::{compile_deck, CompileSummary};
pub use error::{Error, Result};
pub use generate::{generate_deck, ContentGenerator, GeneratedDeck};
pub use inline::split_runs;
pub use prompt::{build_prompt, constraints_text, GenerationRequest};
pub use resolve::resolve_layout;
pub use script::parse_script;
pub use template::{MemoryTemplate, Template};
pub use types::{
    Extent, Layout, LayoutConstraint, Paragraph, Placeholder, PlaceholderRole, Slide,
    SlidePlaceholder, SlideSpec, TextRun,
};
