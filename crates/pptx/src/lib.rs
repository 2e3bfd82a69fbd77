//! PPTX (Office Open XML) template store for the slide compiler.
//!
//! Loads a .pptx package, exposes the layouts of its first slide master,
//! instantiates new slides from them and writes the edited package back out.

mod layout;
mod package;
mod presentation;
mod rels;
mod slide;
pub mod template;
mod text;
mod xml;

pub use template::PptxTemplate;
