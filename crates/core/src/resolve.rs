//! Layout resolution by tiered fuzzy name matching.
//!
//! Each tier is a predicate over (requested name, layout name) pairs; tiers
//! are tried in order and the first layout satisfying a tier wins. When no
//! tier matches, the first layout is used, so resolution never fails.

use crate::types::Layout;

/// A resolution tier. Both names arrive already folded to upper case.
type Tier = fn(&str, &str) -> bool;

/// Tiers in priority order, with a label for logging.
const TIERS: &[(&str, Tier)] = &[
    ("exact", exact),
    ("contains", contains),
    ("keyword", keyword),
    ("title-and-body", title_and_body),
];

fn exact(requested: &str, layout: &str) -> bool {
    requested == layout
}

fn contains(requested: &str, layout: &str) -> bool {
    layout.contains(requested)
}

/// Classify the request by its own wording, then look for a layout of the
/// same family.
fn keyword(requested: &str, layout: &str) -> bool {
    let title = requested.contains("TITLE");
    let section = requested.contains("SECTION");

    if title && section {
        layout.contains("SECTION") || layout.contains("TITLE")
    } else if title {
        layout.contains("TITLE") && !layout.contains("SECTION")
    } else if section {
        layout.contains("SECTION")
    } else if requested.contains("BLANK") {
        layout.contains("BLANK")
    } else {
        false
    }
}

fn title_and_body(_requested: &str, layout: &str) -> bool {
    layout.contains("TITLE_AND_BODY")
}

/// Resolve a free-text layout name to a layout index.
///
/// Comparisons are case-insensitive. Returns 0 when nothing matches; callers
/// must ensure the template has at least one layout before using the index.
pub fn resolve_layout(requested: &str, layouts: &[Layout]) -> usize {
    let requested = requested.to_uppercase();
    let names: Vec<String> = layouts.iter().map(|l| l.name.to_uppercase()).collect();

    for (label, tier) in TIERS {
        if let Some(index) = names.iter().position(|name| tier(&requested, name)) {
            log::debug!(
                "Resolved layout '{}' to #{} '{}' ({} match)",
                requested,
                index,
                layouts[index].name,
                label
            );
            return index;
        }
    }

    log::debug!("No layout matches '{}', using first layout", requested);
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layouts(names: &[&str]) -> Vec<Layout> {
        names.iter().map(|n| Layout::new(*n)).collect()
    }

    #[test]
    fn test_exact_beats_substring() {
        let layouts = layouts(&["Title Slide", "Title and Content"]);
        assert_eq!(resolve_layout("Title Slide", &layouts), 0);
        assert_eq!(resolve_layout("title and content", &layouts), 1);
    }

    #[test]
    fn test_exact_beats_earlier_substring() {
        let layouts = layouts(&["Title and Content", "Content"]);
        assert_eq!(resolve_layout("content", &layouts), 1);
    }

    #[test]
    fn test_substring_match() {
        let layouts = layouts(&["Blank", "Two Content", "Comparison"]);
        assert_eq!(resolve_layout("compar", &layouts), 2);
    }

    #[test]
    fn test_keyword_title_avoids_section() {
        let layouts = layouts(&["SECTION_TITLE", "Blank", "MAIN_TITLE_SLIDE"]);
        assert_eq!(resolve_layout("Fancy Title", &layouts), 2);
    }

    #[test]
    fn test_keyword_title_and_section_accepts_either() {
        let layouts = layouts(&["Blank", "Big Title", "Section Header"]);
        assert_eq!(resolve_layout("title section", &layouts), 1);
    }

    #[test]
    fn test_keyword_section() {
        let layouts = layouts(&["Title Slide", "Section Header"]);
        assert_eq!(resolve_layout("SECTION_HEADER", &layouts), 1);
    }

    #[test]
    fn test_keyword_blank() {
        let layouts = layouts(&["Title Slide", "Blank"]);
        assert_eq!(resolve_layout("a blank page", &layouts), 1);
    }

    #[test]
    fn test_title_and_body_fallback() {
        let layouts = layouts(&["TITLE", "TITLE_AND_BODY", "BLANK"]);
        assert_eq!(resolve_layout("Quote", &layouts), 1);
    }

    #[test]
    fn test_first_layout_fallback() {
        let layouts = layouts(&["Cover", "Agenda"]);
        assert_eq!(resolve_layout("Comparison", &layouts), 0);
    }

    #[test]
    fn test_total_over_odd_inputs() {
        let layouts = layouts(&["Title Slide", "Blank"]);
        for requested in ["", "   ", "Überschrift", "\u{1F600}", "<!-- -->"] {
            assert!(resolve_layout(requested, &layouts) < layouts.len());
        }
    }

    #[test]
    fn test_empty_request_matches_first_by_substring() {
        let layouts = layouts(&["Cover", "Blank"]);
        assert_eq!(resolve_layout("", &layouts), 0);
    }
}
