//! Deck compilation: turns slide specs into slides on a template.

use crate::error::{Error, Result};
use crate::place::{place_content, select_body_placeholder};
use crate::resolve::resolve_layout;
use crate::template::Template;
use crate::types::SlideSpec;
use serde::Serialize;

/// Layout requested when a slide spec names none.
pub const FALLBACK_LAYOUT: &str = "TITLE_AND_CONTENT";

/// Title used when a slide spec has none.
pub const UNTITLED: &str = "Untitled";

/// Outcome of one compilation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    /// Slides created from specs.
    pub slides_added: usize,

    /// Template slides removed after compilation.
    pub originals_removed: usize,

    /// Slides whose content was written into a body placeholder.
    pub bodies_filled: usize,

    /// Slides whose content had nowhere to go.
    pub content_dropped: usize,
}

/// Whether a layout receives body content.
///
/// Title, section-header and blank layouts only carry a title.
pub fn is_content_layout(layout_name: &str) -> bool {
    let name = layout_name.to_uppercase();

    let title_only = name == "TITLE"
        || name == "SECTION_HEADER"
        || name.contains("SECTION HEADER")
        || (name.contains("TITLE")
            && name.contains("SECTION")
            && !name.contains("CONTENT")
            && !name.contains("BODY"))
        || name.contains("BLANK");

    !title_only
}

/// Compile slide specs onto the template, then strip the slides the template
/// started with.
///
/// The template must have at least one layout. An empty spec list is not an
/// error: the result is a deck with no slides.
pub fn compile_deck<T: Template + ?Sized>(
    template: &mut T,
    specs: &[SlideSpec],
) -> Result<CompileSummary> {
    if template.layouts().is_empty() {
        return Err(Error::MalformedTemplate(
            "template has no slide layouts".to_string(),
        ));
    }

    let original_count = template.slide_count();
    let mut summary = CompileSummary::default();

    if specs.is_empty() {
        log::warn!("Script produced no slides; the deck will be empty");
    }

    for spec in specs {
        let requested = spec.layout_name.as_deref().unwrap_or(FALLBACK_LAYOUT);
        let layout_index = resolve_layout(requested, template.layouts());
        let slide = template.add_slide(layout_index)?;

        if let Some(position) = slide.title_position() {
            slide.placeholders[position].set_text(spec.title.as_deref().unwrap_or(UNTITLED));
        }

        summary.slides_added += 1;

        if spec.content_lines.is_empty() || !is_content_layout(&slide.layout_name) {
            continue;
        }

        match select_body_placeholder(slide) {
            Some(position) if slide.placeholders[position].shape.has_text_frame => {
                place_content(&mut slide.placeholders[position], &spec.content_lines);
                summary.bodies_filled += 1;
            }
            _ => {
                log::warn!(
                    "No text placeholder on layout '{}'; dropping {} content lines",
                    slide.layout_name,
                    spec.content_lines.len()
                );
                summary.content_dropped += 1;
            }
        }
    }

    for index in (0..original_count).rev() {
        template.remove_slide(index)?;
    }
    summary.originals_removed = original_count;

    log::debug!(
        "Compiled {} slides, removed {} template slides",
        summary.slides_added,
        summary.originals_removed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::BODY_FONT_SIZE;
    use crate::script::parse_script;
    use crate::template::MemoryTemplate;
    use crate::types::{Layout, Placeholder, PlaceholderRole, Slide, TextRun};

    fn sample_layouts() -> Vec<Layout> {
        vec![
            Layout::new("TITLE")
                .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0))
                .with_placeholder(Placeholder::new("Subtitle 2", PlaceholderRole::Other, 1)),
            Layout::new("SECTION_HEADER")
                .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0))
                .with_placeholder(Placeholder::new("Text 2", PlaceholderRole::Body, 1)),
            Layout::new("TITLE_AND_CONTENT")
                .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0))
                .with_placeholder(Placeholder::new("Content 2", PlaceholderRole::Object, 1)),
            Layout::new("BLANK"),
        ]
    }

    fn added(template: &MemoryTemplate) -> Vec<&Slide> {
        template.added_slides().collect()
    }

    #[test]
    fn test_content_layout_classification() {
        assert!(!is_content_layout("TITLE"));
        assert!(!is_content_layout("section_header"));
        assert!(!is_content_layout("Section Header"));
        assert!(!is_content_layout("TITLE_SECTION"));
        assert!(!is_content_layout("Blank"));
        assert!(is_content_layout("TITLE_AND_CONTENT"));
        assert!(is_content_layout("Title Section Body"));
        assert!(is_content_layout("Title Slide"));
    }

    #[test]
    fn test_originals_removed_regardless_of_count() {
        for existing in [0, 1, 5] {
            let mut template = MemoryTemplate::new(sample_layouts()).with_existing_slides(existing);
            let specs = parse_script("## One\n## Two\n<!-- Layout: BLANK -->\n## Three");
            let summary = compile_deck(&mut template, &specs).unwrap();

            assert_eq!(template.slide_count(), specs.len());
            assert_eq!(summary.originals_removed, existing);
            assert_eq!(summary.slides_added, specs.len());
            assert_eq!(added(&template).len(), template.slide_count());
        }
    }

    #[test]
    fn test_empty_script_yields_empty_deck() {
        let mut template = MemoryTemplate::new(sample_layouts()).with_existing_slides(3);
        let summary = compile_deck(&mut template, &[]).unwrap();
        assert_eq!(template.slide_count(), 0);
        assert_eq!(summary.slides_added, 0);
    }

    #[test]
    fn test_titles_and_content() {
        let mut template = MemoryTemplate::new(sample_layouts()).with_existing_slides(1);
        let specs = parse_script(
            "<!-- Layout: TITLE -->\n## Launch\n\
             <!-- Layout: TITLE_AND_CONTENT -->\n- **Fast**: yes\n  - very",
        );
        let summary = compile_deck(&mut template, &specs).unwrap();
        assert_eq!(summary.bodies_filled, 1);

        let slides = added(&template);
        assert_eq!(slides[0].layout_name, "TITLE");
        assert_eq!(slides[0].title().as_deref(), Some("Launch"));
        assert_eq!(slides[1].title().as_deref(), Some(UNTITLED));

        let body = &slides[1].placeholders[1];
        assert_eq!(body.paragraphs.len(), 2);
        assert_eq!(body.paragraphs[0].runs[0], TextRun::bold("Fast"));
        assert_eq!(body.paragraphs[1].level, 1);
        assert_eq!(body.paragraphs[1].font_size, Some(BODY_FONT_SIZE));
    }

    #[test]
    fn test_section_header_never_gets_body() {
        let mut template = MemoryTemplate::new(sample_layouts());
        let specs = parse_script("<!-- Layout: SECTION_HEADER -->\n## Part 1\n- stray bullet");
        let summary = compile_deck(&mut template, &specs).unwrap();

        assert_eq!(summary.bodies_filled, 0);
        let slides = added(&template);
        assert_eq!(slides[0].placeholders[1].text(), "");
    }

    #[test]
    fn test_missing_layout_name_uses_fallback() {
        let mut template = MemoryTemplate::new(sample_layouts());
        let specs = parse_script("## Agenda\n- item");
        compile_deck(&mut template, &specs).unwrap();
        assert_eq!(added(&template)[0].layout_name, "TITLE_AND_CONTENT");
    }

    #[test]
    fn test_content_dropped_without_placeholder() {
        let layouts = vec![Layout::new("Picture Only").with_placeholder(
            Placeholder::new("Picture 1", PlaceholderRole::Other, 1).without_text_frame(),
        )];
        let mut template = MemoryTemplate::new(layouts);
        let specs = parse_script("<!-- Layout: Picture Only -->\n- orphan");
        let summary = compile_deck(&mut template, &specs).unwrap();

        assert_eq!(summary.slides_added, 1);
        assert_eq!(summary.content_dropped, 1);
    }

    #[test]
    fn test_template_without_layouts() {
        let mut template = MemoryTemplate::new(Vec::new());
        assert!(matches!(
            compile_deck(&mut template, &[]),
            Err(Error::MalformedTemplate(_))
        ));
    }
}
