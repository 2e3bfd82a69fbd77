//! Template store abstraction.
//!
//! A template exposes its layouts, lets the compiler instantiate slides from
//! them and remove slides by index. Slides that existed before compilation
//! are opaque to the compiler; only their count and position matter.

use crate::error::{Error, Result};
use crate::types::{Layout, Slide};

/// Typed access to an editable slide template.
pub trait Template {
    /// Layouts in template order.
    fn layouts(&self) -> &[Layout];

    /// Number of slides currently in the deck.
    fn slide_count(&self) -> usize;

    /// Append a slide built from the layout at `layout_index`.
    fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide>;

    /// Remove the slide at `index`.
    fn remove_slide(&mut self, index: usize) -> Result<()>;

    /// Serialize the deck in the store's native format.
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// A slide in an in-memory deck.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemorySlide {
    /// A slide that came with the template, identified by a label.
    Existing { label: String },
    /// A slide created from a layout.
    Added(Slide),
}

/// Template store kept entirely in memory.
///
/// Serializes to JSON. Useful as a reference store and in tests.
// Derived by path: `serialize()` must resolve to the Template method.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MemoryTemplate {
    layouts: Vec<Layout>,
    slides: Vec<MemorySlide>,
}

impl MemoryTemplate {
    /// Create a template with the given layouts and no slides.
    pub fn new(layouts: Vec<Layout>) -> Self {
        Self {
            layouts,
            slides: Vec::new(),
        }
    }

    /// Add pre-existing slides, as if they came with the template.
    pub fn with_existing_slides(mut self, count: usize) -> Self {
        for i in 0..count {
            self.slides.push(MemorySlide::Existing {
                label: format!("template slide {}", i + 1),
            });
        }
        self
    }

    pub fn slides(&self) -> &[MemorySlide] {
        &self.slides
    }

    /// Slides created from layouts, in deck order.
    pub fn added_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter_map(|s| match s {
            MemorySlide::Added(slide) => Some(slide),
            MemorySlide::Existing { .. } => None,
        })
    }
}

impl Template for MemoryTemplate {
    fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide> {
        let layout = self
            .layouts
            .get(layout_index)
            .ok_or(Error::LayoutOutOfRange {
                index: layout_index,
                count: self.layouts.len(),
            })?;
        self.slides
            .push(MemorySlide::Added(Slide::from_layout(layout_index, layout)));
        match self.slides.last_mut() {
            Some(MemorySlide::Added(slide)) => Ok(slide),
            _ => unreachable!("slide was just pushed"),
        }
    }

    fn remove_slide(&mut self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(Error::SlideOutOfRange {
                index,
                count: self.slides.len(),
            });
        }
        self.slides.remove(index);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}
