//! Test helpers for classified output.
//!
//! Used by the unit tests and by the integration tests under `tests/`. The assertions panic
//! with a message naming the offending span, which is what proptest shrinks against.

use super::category::TokenCategory;
use super::classify::{flatten, segments, ClassifiedSpan};

/// Top-level spans as `(category, text)` pairs.
pub fn tokens<'s>(source: &'s str, spans: &[ClassifiedSpan]) -> Vec<(TokenCategory, &'s str)> {
    spans
        .iter()
        .map(|span| (span.category, span.text(source)))
        .collect()
}

/// Every span, children included, depth-first, as `(category, text)` pairs.
pub fn all_tokens<'s>(source: &'s str, spans: &[ClassifiedSpan]) -> Vec<(TokenCategory, &'s str)> {
    flatten(spans)
        .into_iter()
        .map(|span| (span.category, span.text(source)))
        .collect()
}

/// Concatenate gaps and span texts back into a string.
pub fn reconstruct(source: &str, spans: &[ClassifiedSpan]) -> String {
    segments(source, spans)
        .iter()
        .map(|segment| segment.text(source))
        .collect()
}

/// Check the structural guarantees of a classification of `source`:
/// spans are non-empty, ordered, non-overlapping, on char boundaries, and children stay
/// inside their parent with the same guarantees among siblings.
pub fn assert_well_formed(source: &str, spans: &[ClassifiedSpan]) {
    assert_siblings(source, 0..source.len(), spans);
}

fn assert_siblings(source: &str, bounds: std::ops::Range<usize>, spans: &[ClassifiedSpan]) {
    let mut previous_end = bounds.start;
    for span in spans {
        assert!(
            span.start < span.end,
            "empty span {span:?} in {source:?}"
        );
        assert!(
            span.start >= previous_end,
            "span {span:?} overlaps its predecessor (ends at {previous_end}) in {source:?}"
        );
        assert!(
            span.end <= bounds.end,
            "span {span:?} escapes its bounds {bounds:?} in {source:?}"
        );
        assert!(
            source.is_char_boundary(span.start) && source.is_char_boundary(span.end),
            "span {span:?} splits a character in {source:?}"
        );
        assert_siblings(source, span.range(), &span.children);
        previous_end = span.end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(category: TokenCategory, start: usize, end: usize) -> ClassifiedSpan {
        ClassifiedSpan {
            category,
            start,
            end,
            children: vec![],
        }
    }

    #[test]
    fn test_reconstruct_fills_gaps() {
        let source = "a+b";
        let spans = vec![span(TokenCategory::Operator, 1, 2)];
        assert_eq!(reconstruct(source, &spans), source);
        assert_eq!(tokens(source, &spans), vec![(TokenCategory::Operator, "+")]);
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn test_overlap_is_rejected() {
        let spans = vec![
            span(TokenCategory::Keyword, 0, 3),
            span(TokenCategory::Keyword, 2, 4),
        ];
        assert_well_formed("abcd", &spans);
    }

    #[test]
    #[should_panic(expected = "escapes")]
    fn test_child_outside_parent_is_rejected() {
        let mut parent = span(TokenCategory::ClassName, 0, 2);
        parent.children.push(span(TokenCategory::Punctuation, 1, 3));
        assert_well_formed("a.b", &[parent]);
    }
}
