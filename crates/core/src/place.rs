//! Body placeholder selection and content placement.

use crate::inline::split_runs;
use crate::types::{Paragraph, PlaceholderRole, Slide, SlidePlaceholder};

/// Font size for every body paragraph, in points.
pub const BODY_FONT_SIZE: u32 = 18;

/// Name fragments that mark a placeholder as a body slot.
const BODY_NAME_HINTS: &[&str] = &["CONTENT", "BODY", "TEXT"];

const INDENT: &str = "  ";
const BULLET_MARKER: &str = "- ";

/// A selection rule. Receives the placeholder, its position, and the
/// position of the slide's title shape.
type Rule = fn(&SlidePlaceholder, usize, Option<usize>) -> bool;

/// Rules in priority order, with a label for logging.
const RULES: &[(&str, Rule)] = &[
    ("body role", by_role),
    ("name hint", by_name),
    ("indexed text", by_index),
    ("any text", any_text),
];

fn by_role(ph: &SlidePlaceholder, _: usize, _: Option<usize>) -> bool {
    ph.shape.role == PlaceholderRole::Body
}

fn by_name(ph: &SlidePlaceholder, _: usize, _: Option<usize>) -> bool {
    let name = ph.shape.name.to_uppercase();
    BODY_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

fn by_index(ph: &SlidePlaceholder, _: usize, _: Option<usize>) -> bool {
    ph.shape.idx != 0 && ph.shape.has_text_frame
}

fn any_text(ph: &SlidePlaceholder, position: usize, title: Option<usize>) -> bool {
    Some(position) != title && ph.shape.has_text_frame
}

/// Pick the placeholder that should receive body content.
///
/// Returns its position on the slide, or `None` when no rule matches.
pub fn select_body_placeholder(slide: &Slide) -> Option<usize> {
    let title = slide.title_position();

    for (label, rule) in RULES {
        let found = slide
            .placeholders
            .iter()
            .enumerate()
            .position(|(i, ph)| rule(ph, i, title));
        if let Some(position) = found {
            log::debug!(
                "Body placeholder '{}' selected by {}",
                slide.placeholders[position].shape.name,
                label
            );
            return Some(position);
        }
    }

    None
}

/// Split a raw content line into its indent level and bullet text.
///
/// Each leading pair of spaces is one level; the `- ` marker is removed
/// after the indentation.
pub fn indent_level(line: &str) -> (u32, &str) {
    let mut level = 0;
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix(INDENT) {
        level += 1;
        rest = stripped;
    }
    let text = rest.strip_prefix(BULLET_MARKER).unwrap_or(rest);
    (level, text)
}

/// Write content lines into a placeholder, one paragraph per line.
///
/// The first line reuses the placeholder's first paragraph; existing text is
/// cleared.
pub fn place_content(placeholder: &mut SlidePlaceholder, content_lines: &[String]) {
    if content_lines.is_empty() {
        return;
    }

    placeholder.clear();

    for (i, line) in content_lines.iter().enumerate() {
        let (level, text) = indent_level(line);
        let paragraph = Paragraph {
            level,
            runs: split_runs(text),
            font_size: Some(BODY_FONT_SIZE),
        };

        if i == 0 {
            placeholder.paragraphs[0] = paragraph;
        } else {
            placeholder.paragraphs.push(paragraph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Layout, Placeholder, TextRun};

    fn slide(placeholders: Vec<Placeholder>) -> Slide {
        let mut layout = Layout::new("Test");
        layout.placeholders = placeholders;
        Slide::from_layout(0, &layout)
    }

    #[test]
    fn test_body_role_first() {
        let slide = slide(vec![
            Placeholder::new("Title 1", PlaceholderRole::Title, 0),
            Placeholder::new("Content Placeholder 2", PlaceholderRole::Object, 1),
            Placeholder::new("Notes", PlaceholderRole::Body, 2),
        ]);
        assert_eq!(select_body_placeholder(&slide), Some(2));
    }

    #[test]
    fn test_name_hint() {
        let slide = slide(vec![
            Placeholder::new("Title 1", PlaceholderRole::Title, 0),
            Placeholder::new("Picture 3", PlaceholderRole::Other, 3),
            Placeholder::new("Text Placeholder 2", PlaceholderRole::Other, 2),
        ]);
        assert_eq!(select_body_placeholder(&slide), Some(2));
    }

    #[test]
    fn test_nonzero_index_with_text() {
        let slide = slide(vec![
            Placeholder::new("Title 1", PlaceholderRole::Title, 0),
            Placeholder::new("Chart 4", PlaceholderRole::Other, 4).without_text_frame(),
            Placeholder::new("Subtitle 2", PlaceholderRole::Other, 1),
        ]);
        assert_eq!(select_body_placeholder(&slide), Some(2));
    }

    #[test]
    fn test_any_text_excludes_title() {
        let slide = slide(vec![
            Placeholder::new("Title 1", PlaceholderRole::Title, 0),
            Placeholder::new("Caption", PlaceholderRole::Other, 0),
        ]);
        assert_eq!(select_body_placeholder(&slide), Some(1));
    }

    #[test]
    fn test_nothing_selected() {
        let slide = slide(vec![Placeholder::new("Title 1", PlaceholderRole::Title, 0)]);
        assert_eq!(select_body_placeholder(&slide), None);
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(indent_level("- top"), (0, "top"));
        assert_eq!(indent_level("  - sub"), (1, "sub"));
        assert_eq!(indent_level("     - odd"), (2, " - odd"));
        assert_eq!(indent_level("plain"), (0, "plain"));
    }

    #[test]
    fn test_place_content() {
        let mut ph = SlidePlaceholder::new(Placeholder::new("Body", PlaceholderRole::Body, 1));
        ph.set_text("prompt text");
        let lines = vec!["- **Fast**: yes".to_string(), "  - really".to_string()];
        place_content(&mut ph, &lines);

        assert_eq!(ph.paragraphs.len(), 2);
        assert_eq!(ph.paragraphs[0].level, 0);
        assert_eq!(
            ph.paragraphs[0].runs,
            vec![TextRun::bold("Fast"), TextRun::plain(": yes")]
        );
        assert_eq!(ph.paragraphs[1].level, 1);
        assert_eq!(ph.paragraphs[1].text(), "really");
        assert!(ph.paragraphs.iter().all(|p| p.font_size == Some(BODY_FONT_SIZE)));
    }

    #[test]
    fn test_place_nothing_keeps_text() {
        let mut ph = SlidePlaceholder::new(Placeholder::new("Body", PlaceholderRole::Body, 1));
        ph.set_text("kept");
        place_content(&mut ph, &[]);
        assert_eq!(ph.text(), "kept");
    }
}
