//! Domain types shared by the compiler and the template stores.

use serde::{Deserialize, Serialize};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Semantic role of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderRole {
    Title,
    Body,
    Object,
    Other,
}

/// Width and height of a shape in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: i64,
    pub height: i64,
}

impl Extent {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Area in square inches.
    pub fn area_sq_inches(&self) -> f64 {
        (self.width as f64 / EMU_PER_INCH) * (self.height as f64 / EMU_PER_INCH)
    }
}

/// A typed content slot on a layout or slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Display name of the shape (e.g. "Content Placeholder 2").
    pub name: String,

    /// Semantic role.
    pub role: PlaceholderRole,

    /// Positional index; 0 is the title slot.
    pub idx: u32,

    /// Geometry, when the shape declares one.
    pub extent: Option<Extent>,

    /// Whether the shape can hold paragraphs.
    pub has_text_frame: bool,
}

impl Placeholder {
    /// Create a text-capable placeholder without geometry.
    pub fn new(name: impl Into<String>, role: PlaceholderRole, idx: u32) -> Self {
        Self {
            name: name.into(),
            role,
            idx,
            extent: None,
            has_text_frame: true,
        }
    }

    /// Attach geometry to this placeholder.
    pub fn with_extent(mut self, width: i64, height: i64) -> Self {
        self.extent = Some(Extent::new(width, height));
        self
    }

    /// Mark this placeholder as unable to hold text.
    pub fn without_text_frame(mut self) -> Self {
        self.has_text_frame = false;
        self
    }
}

/// A reusable slide blueprint. Names are not guaranteed unique; a layout is
/// identified by its position in the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub placeholders: Vec<Placeholder>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholders: Vec::new(),
        }
    }

    /// Add a placeholder to this layout.
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholders.push(placeholder);
        self
    }
}

/// Capacity limits derived from a layout's placeholder geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConstraint {
    /// Maximum title length in words.
    pub title_capacity: u32,

    /// Maximum number of bullets in the body.
    pub body_capacity: u32,

    /// Whether the layout has a body or content slot.
    pub has_body: bool,
}

impl Default for LayoutConstraint {
    fn default() -> Self {
        Self {
            title_capacity: 10,
            body_capacity: 10,
            has_body: false,
        }
    }
}

/// One slide as described by the script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Requested layout name, if the script named one.
    pub layout_name: Option<String>,

    /// Slide title; never an empty string.
    pub title: Option<String>,

    /// Raw bullet lines, indentation and marker included.
    pub content_lines: Vec<String>,
}

impl SlideSpec {
    /// Whether the slide carries anything worth emitting.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content_lines.is_empty()
    }
}

/// A span of text sharing one formatting attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// A paragraph of runs at an indent level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Zero-based outline level.
    pub level: u32,

    pub runs: Vec<TextRun>,

    /// Font size in points; `None` inherits from the layout.
    pub font_size: Option<u32>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A placeholder instantiated on a slide, with its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidePlaceholder {
    pub shape: Placeholder,
    pub paragraphs: Vec<Paragraph>,
}

impl SlidePlaceholder {
    /// Instantiate a placeholder with a single empty paragraph.
    pub fn new(shape: Placeholder) -> Self {
        let paragraphs = if shape.has_text_frame {
            vec![Paragraph::default()]
        } else {
            Vec::new()
        };
        Self { shape, paragraphs }
    }

    /// Remove all text, keeping one empty paragraph.
    pub fn clear(&mut self) {
        self.paragraphs.truncate(1);
        if let Some(first) = self.paragraphs.first_mut() {
            first.runs.clear();
        } else {
            self.paragraphs.push(Paragraph::default());
        }
    }

    /// Replace the text with a single plain run.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        if let Some(first) = self.paragraphs.first_mut() {
            first.runs.push(TextRun::plain(text));
        }
    }

    /// All paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A slide created during compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Position of the source layout in the template.
    pub layout_index: usize,

    /// Name of the source layout.
    pub layout_name: String,

    /// Placeholders in layout order.
    pub placeholders: Vec<SlidePlaceholder>,
}

impl Slide {
    /// Instantiate a slide from every placeholder on the layout.
    pub fn from_layout(layout_index: usize, layout: &Layout) -> Self {
        Self::with_placeholders(layout_index, &layout.name, layout.placeholders.iter().cloned())
    }

    /// Instantiate a slide from a chosen subset of layout placeholders.
    pub fn with_placeholders(
        layout_index: usize,
        layout_name: &str,
        shapes: impl IntoIterator<Item = Placeholder>,
    ) -> Self {
        Self {
            layout_index,
            layout_name: layout_name.to_string(),
            placeholders: shapes.into_iter().map(SlidePlaceholder::new).collect(),
        }
    }

    /// Position of the title shape: the placeholder at index 0.
    pub fn title_position(&self) -> Option<usize> {
        self.placeholders.iter().position(|p| p.shape.idx == 0)
    }

    /// Text of the title shape, if the slide has one.
    pub fn title(&self) -> Option<String> {
        self.title_position().map(|i| self.placeholders[i].text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_sq_inches() {
        let extent = Extent::new(914_400 * 2, 914_400 * 3);
        assert!((extent.area_sq_inches() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_title_position_uses_idx_zero() {
        let layout = Layout::new("Title and Content")
            .with_placeholder(Placeholder::new("Content Placeholder 2", PlaceholderRole::Object, 1))
            .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0));
        let slide = Slide::from_layout(0, &layout);
        assert_eq!(slide.title_position(), Some(1));
    }

    #[test]
    fn test_clear_keeps_one_empty_paragraph() {
        let mut ph = SlidePlaceholder::new(Placeholder::new("Body", PlaceholderRole::Body, 1));
        ph.paragraphs.push(Paragraph {
            level: 1,
            runs: vec![TextRun::plain("old")],
            font_size: None,
        });
        ph.paragraphs[0].runs.push(TextRun::plain("first"));
        ph.clear();
        assert_eq!(ph.paragraphs.len(), 1);
        assert!(ph.paragraphs[0].runs.is_empty());
    }

    #[test]
    fn test_slide_spec_is_empty() {
        assert!(SlideSpec::default().is_empty());
        let spec = SlideSpec {
            title: Some("Hello".to_string()),
            ..Default::default()
        };
        assert!(!spec.is_empty());
    }
}
