//! Inline emphasis splitting.
//!
//! Bold spans are written `**text**` or `__text__`. Delimiters must match in
//! style and are matched non-greedily; an opener without a closer of the same
//! style stays literal text.

use crate::types::TextRun;
use regex::Regex;
use std::sync::LazyLock;

/// Length of an emphasis delimiter.
const DELIMITER_LEN: usize = 2;

/// Regex matching one emphasized span of either style.
static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*.*?\*\*|__.*?__").unwrap());

/// Classify a matched span: bold when it wraps at least one character.
fn emphasized_run(span: &str) -> TextRun {
    if span.len() > DELIMITER_LEN * 2 {
        TextRun::bold(&span[DELIMITER_LEN..span.len() - DELIMITER_LEN])
    } else {
        // "****" or "____": nothing inside, keep the markers as text.
        TextRun::plain(span)
    }
}

/// Split a line into plain and bold runs, skipping empty pieces.
pub fn split_runs(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for m in EMPHASIS_REGEX.find_iter(text) {
        if m.start() > last {
            runs.push(TextRun::plain(&text[last..m.start()]));
        }
        runs.push(emphasized_run(m.as_str()));
        last = m.end();
    }

    if last < text.len() {
        runs.push(TextRun::plain(&text[last..]));
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_bold() {
        assert_eq!(
            split_runs("**Feature 1**: desc"),
            vec![TextRun::bold("Feature 1"), TextRun::plain(": desc")]
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(split_runs("no emphasis here"), vec![TextRun::plain("no emphasis here")]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_runs("").is_empty());
    }

    #[test]
    fn test_underscore_style_and_multiple_spans() {
        assert_eq!(
            split_runs("a __b__ c **d**"),
            vec![
                TextRun::plain("a "),
                TextRun::bold("b"),
                TextRun::plain(" c "),
                TextRun::bold("d"),
            ]
        );
    }

    #[test]
    fn test_styles_do_not_mix() {
        assert_eq!(split_runs("**half__"), vec![TextRun::plain("**half__")]);
    }

    #[test]
    fn test_unmatched_opener_is_literal() {
        assert_eq!(
            split_runs("**bold** and **dangling"),
            vec![TextRun::bold("bold"), TextRun::plain(" and **dangling")]
        );
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(
            split_runs("**a** b **c**"),
            vec![TextRun::bold("a"), TextRun::plain(" b "), TextRun::bold("c")]
        );
    }

    #[test]
    fn test_empty_emphasis_is_literal() {
        assert_eq!(
            split_runs("x****y"),
            vec![TextRun::plain("x"), TextRun::plain("****"), TextRun::plain("y")]
        );
    }
}
