//! Prompt construction for the content generation service.

use crate::capacity::LayoutConstraints;
use serde::Serialize;

/// Layout names used in the worked example when the template has fewer
/// layouts than the example needs.
const EXAMPLE_FALLBACKS: [&str; 3] = ["TITLE", "SECTION_HEADER", "TITLE_AND_CONTENT"];

/// A single request to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Render constraint records as an indented list, one layout per line.
pub fn constraints_text(constraints: &LayoutConstraints) -> String {
    constraints
        .iter()
        .map(|(name, c)| {
            format!(
                "    - {}: Title max {} words, Content max {} bullet points",
                name, c.title_capacity, c.body_capacity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the generation request for a template's layouts.
pub fn build_prompt(
    layout_names: &[String],
    constraints: &LayoutConstraints,
    user_content: &str,
) -> GenerationRequest {
    let example = |i: usize| {
        layout_names
            .get(i)
            .map(String::as_str)
            .unwrap_or(EXAMPLE_FALLBACKS[i])
    };

    let layout_list = layout_names
        .iter()
        .map(|name| format!("    - {}", name))
        .collect::<Vec<_>>()
        .join("\n");

    let system_prompt = format!(
        r#"
You are an expert presentation designer creating structured Markdown for PowerPoint slides. Follow these rules:

1. Structure with `##` for slide titles and `-` for bullet points
2. Use layout comments like `<!-- Layout: TITLE -->` before each slide
3. For TITLE slides: Only include a title, no content
4. For SECTION_HEADER slides: Only include a title, no content
5. For content slides: Include a title and bullet points
6. Preserve bullet point hierarchy using indentation (2 spaces per level)
7. Use markdown formatting for emphasis:
   - Use **bold** for important terms, key concepts, or section headers within bullet points
   - Apply bold formatting sparingly for maximum impact
   - Do NOT use *italic* or other formatting
8. Keep content within space constraints:
   - Limit titles to the specified word count for each layout
   - Limit content slides to the specified bullet point count for each layout
   - If you have more content, split it into multiple slides with clear sub-topics
   - Keep bullet points concise (1 short sentence each)
9. Do NOT include markdown tables - describe them in plain text instead as bullet points or paragraphs
10. When you need to present tabular data, convert it to bullet points with clear labels
11. Do NOT include placeholder text like "List of Americas partner and non-partner teams"
12. Do NOT include text that says "(Table format would be used here)"
13. Do NOT include any text that indicates missing content or placeholders
14. When presenting data that would normally be in a table, format it as a series of bullet points with clear labels
15. Use ONLY these EXACT layout names from the available layouts:
{layout_list}

Layout space constraints:
{constraints}

Example output:
<!-- Layout: {first} -->
## Product Launch

<!-- Layout: {second} -->
## Product Overview

<!-- Layout: {third} -->
## Key Features
- **Feature 1**: Brief description
- **Feature 2**: Brief description
  - Sub-point for feature 2
- **Feature 3**: Brief description

Example of tabular data converted to bullet points:
## Team Information
- **Americas Partner Team**: Description of the team's responsibilities
- **Americas Non-Partner Team**: Description of the team's responsibilities
- **EMEA Team**: Description of the team's responsibilities
"#,
        layout_list = layout_list,
        constraints = constraints_text(constraints),
        first = example(0),
        second = example(1),
        third = example(2),
    );

    GenerationRequest {
        system_prompt,
        user_prompt: format!("User-provided content:\n{}", user_content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayoutConstraint;

    fn constraints() -> LayoutConstraints {
        let mut constraints = LayoutConstraints::new();
        constraints.insert(
            "Title Slide",
            LayoutConstraint {
                title_capacity: 8,
                body_capacity: 10,
                has_body: false,
            },
        );
        constraints.insert(
            "Title and Content",
            LayoutConstraint {
                title_capacity: 5,
                body_capacity: 12,
                has_body: true,
            },
        );
        constraints
    }

    #[test]
    fn test_constraints_text() {
        assert_eq!(
            constraints_text(&constraints()),
            "    - Title Slide: Title max 8 words, Content max 10 bullet points\n    \
             - Title and Content: Title max 5 words, Content max 12 bullet points"
        );
    }

    #[test]
    fn test_prompt_uses_layout_names_with_fallbacks() {
        let names = vec!["Title Slide".to_string(), "Title and Content".to_string()];
        let request = build_prompt(&names, &constraints(), "Quarterly results");

        assert!(request.system_prompt.contains("<!-- Layout: Title Slide -->"));
        assert!(request.system_prompt.contains("<!-- Layout: Title and Content -->"));
        assert!(request.system_prompt.contains("<!-- Layout: TITLE_AND_CONTENT -->"));
        assert!(request.system_prompt.contains("    - Title and Content\n"));
        assert_eq!(request.user_prompt, "User-provided content:\nQuarterly results");
    }

    #[test]
    fn test_prompt_discourages_tables_and_filler() {
        let request = build_prompt(&[], &constraints(), "Team roster");
        let prompt = &request.system_prompt;

        assert!(prompt.contains("12. Do NOT include text that says \"(Table format would be used here)\""));
        assert!(prompt.contains(
            "14. When presenting data that would normally be in a table, format it as a series of bullet points with clear labels"
        ));
        assert!(prompt.contains("15. Use ONLY these EXACT layout names"));
        assert!(prompt.contains("Example of tabular data converted to bullet points:\n## Team Information\n"));
        assert!(prompt.ends_with("- **EMEA Team**: Description of the team's responsibilities\n"));
    }
}
