//! Slide script parser.
//!
//! The script is line oriented:
//!
//! ```text
//! <!-- Layout: TITLE_AND_CONTENT -->
//! ## Key Features
//! - **Fast**: compiled
//!   - sub point
//! ```
//!
//! A layout comment starts a new slide, `## ` sets the title and `- ` lines
//! (optionally indented) are bullets. Anything else is ignored.

use crate::types::SlideSpec;
use regex::Regex;
use std::sync::LazyLock;

const LAYOUT_OPEN: &str = "<!-- Layout:";
const LAYOUT_CLOSE: &str = "-->";
const TITLE_MARKER: &str = "## ";
const BULLET_MARKER: &str = "- ";

/// Regex matching an indented bullet.
static INDENTED_BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+- ").unwrap());

/// Accumulates slides while walking the script.
#[derive(Debug, Default)]
struct ScriptAccumulator {
    current: SlideSpec,
    slides: Vec<SlideSpec>,
}

impl ScriptAccumulator {
    /// Emit the in-progress slide if it has a title or content.
    fn finalize(&mut self) {
        let slide = std::mem::take(&mut self.current);
        if !slide.is_empty() {
            self.slides.push(slide);
        }
    }

    fn start_slide(&mut self, layout_name: String) {
        self.finalize();
        self.current.layout_name = Some(layout_name);
    }

    fn set_title(&mut self, title: &str) {
        // An empty heading behaves as if no title was given.
        self.current.title = (!title.is_empty()).then(|| title.to_string());
    }

    fn push_line(&mut self, line: &str) {
        self.current.content_lines.push(line.to_string());
    }

    fn finish(mut self) -> Vec<SlideSpec> {
        self.finalize();
        self.slides
    }
}

/// Extract the layout name from a `<!-- Layout: name -->` line.
fn layout_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix(LAYOUT_OPEN)?;
    let name = rest.split(LAYOUT_CLOSE).next().unwrap_or(rest);
    Some(name.trim().to_string())
}

fn is_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKER) || INDENTED_BULLET_REGEX.is_match(line)
}

/// Parse a slide script into slide specs, in order of appearance.
///
/// Unrecognized lines are skipped; a script with nothing recognizable
/// yields an empty vector.
pub fn parse_script(script: &str) -> Vec<SlideSpec> {
    let mut acc = ScriptAccumulator::default();

    for line in script.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(name) = layout_name(line) {
            acc.start_slide(name);
        } else if let Some(title) = line.strip_prefix(TITLE_MARKER) {
            acc.set_title(title.trim());
        } else if is_bullet(line) {
            acc.push_line(line);
        }
    }

    let slides = acc.finish();
    log::debug!("Parsed {} slides from script", slides.len());
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(layout: Option<&str>, title: Option<&str>, content: &[&str]) -> SlideSpec {
        SlideSpec {
            layout_name: layout.map(String::from),
            title: title.map(String::from),
            content_lines: content.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_two_slides_with_nested_bullets() {
        let script = "<!-- Layout: TITLE -->\n## Hello\n<!-- Layout: CONTENT -->\n## World\n- point1\n  - point2";
        assert_eq!(
            parse_script(script),
            vec![
                spec(Some("TITLE"), Some("Hello"), &[]),
                spec(Some("CONTENT"), Some("World"), &["- point1", "  - point2"]),
            ]
        );
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("").is_empty());
        assert!(parse_script("just some prose\n\n* not a bullet").is_empty());
    }

    #[test]
    fn test_layout_without_content_is_replaced() {
        let script = "<!-- Layout: A -->\n<!-- Layout: B -->\n## Only";
        assert_eq!(parse_script(script), vec![spec(Some("B"), Some("Only"), &[])]);
    }

    #[test]
    fn test_slide_without_layout() {
        let script = "## Intro\n- first\n\n<!-- Layout: Blank -->\n## Next";
        assert_eq!(
            parse_script(script),
            vec![
                spec(None, Some("Intro"), &["- first"]),
                spec(Some("Blank"), Some("Next"), &[]),
            ]
        );
    }

    #[test]
    fn test_content_without_title() {
        let script = "<!-- Layout: Body -->\n- alone";
        assert_eq!(parse_script(script), vec![spec(Some("Body"), None, &["- alone"])]);
    }

    #[test]
    fn test_trailing_whitespace_trimmed_and_other_lines_ignored() {
        let script = "<!-- Layout: X -->\n## Title   \n# Not a title\n-no space\n- kept   \r\n";
        assert_eq!(parse_script(script), vec![spec(Some("X"), Some("Title"), &["- kept"])]);
    }

    #[test]
    fn test_unterminated_layout_comment() {
        let script = "<!-- Layout: Two Content\n## Compare";
        assert_eq!(
            parse_script(script),
            vec![spec(Some("Two Content"), Some("Compare"), &[])]
        );
    }

    #[test]
    fn test_empty_heading_is_no_title() {
        assert!(parse_script("<!-- Layout: X -->\n## ").is_empty());
    }
}
