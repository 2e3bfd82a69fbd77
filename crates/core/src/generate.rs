//! End-to-end pipeline: constraints, prompt, generation, parse, compile.

use crate::capacity::build_constraints;
use crate::compile::{compile_deck, CompileSummary};
use crate::error::Result;
use crate::prompt::{build_prompt, GenerationRequest};
use crate::script::parse_script;
use crate::template::Template;

/// A service that turns a prompt into a slide script.
///
/// Implementations make a single request and report failures as
/// [`Error::Generation`](crate::Error::Generation); callers do not retry.
pub trait ContentGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Result of a full generation run.
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    /// Raw script returned by the generator.
    pub script: String,

    pub summary: CompileSummary,
}

/// Generate a script for `user_content` and compile it onto the template.
pub fn generate_deck<T, G>(
    template: &mut T,
    user_content: &str,
    generator: &G,
) -> Result<GeneratedDeck>
where
    T: Template + ?Sized,
    G: ContentGenerator + ?Sized,
{
    let layouts = template.layouts();
    let constraints = build_constraints(layouts);
    let layout_names: Vec<String> = layouts.iter().map(|l| l.name.clone()).collect();

    let request = build_prompt(&layout_names, &constraints, user_content);
    let script = generator.generate(&request)?;
    log::debug!("Generator returned {} bytes of script", script.len());

    let specs = parse_script(&script);
    let summary = compile_deck(template, &specs)?;

    Ok(GeneratedDeck { script, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::template::MemoryTemplate;
    use crate::types::{Layout, Placeholder, PlaceholderRole};
    use std::cell::RefCell;

    /// Generator returning a canned script and recording the request.
    struct StubGenerator {
        script: std::result::Result<String, String>,
        seen: RefCell<Vec<GenerationRequest>>,
    }

    impl StubGenerator {
        fn new(script: std::result::Result<&str, &str>) -> Self {
            Self {
                script: script.map(String::from).map_err(String::from),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContentGenerator for StubGenerator {
        fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.seen.borrow_mut().push(request.clone());
            self.script.clone().map_err(Error::Generation)
        }
    }

    fn template() -> MemoryTemplate {
        MemoryTemplate::new(vec![
            Layout::new("Title Slide")
                .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0)),
            Layout::new("Title and Content")
                .with_placeholder(Placeholder::new("Title 1", PlaceholderRole::Title, 0))
                .with_placeholder(Placeholder::new("Content Placeholder 2", PlaceholderRole::Object, 1)),
        ])
        .with_existing_slides(2)
    }

    #[test]
    fn test_generate_deck() {
        let generator = StubGenerator::new(Ok(
            "<!-- Layout: Title Slide -->\n## Launch\n<!-- Layout: Title and Content -->\n## Why\n- **Speed**",
        ));
        let mut template = template();
        let deck = generate_deck(&mut template, "launch notes", &generator).unwrap();

        assert_eq!(deck.summary.slides_added, 2);
        assert_eq!(template.slide_count(), 2);

        let seen = generator.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0]
            .system_prompt
            .contains("Title and Content: Title max 8 words, Content max 10 bullet points"));
        assert!(seen[0].user_prompt.ends_with("launch notes"));
    }

    #[test]
    fn test_generation_failure_leaves_template_untouched() {
        let generator = StubGenerator::new(Err("provider unavailable"));
        let mut template = template();
        let err = generate_deck(&mut template, "anything", &generator).unwrap_err();

        assert!(matches!(err, Error::Generation(ref m) if m == "provider unavailable"));
        assert_eq!(template.slide_count(), 2);
    }
}
