//! The classification driver.
//!
//! [Spans] is the only scanner in the crate. It is used for top-level text and, with an offset,
//! for the interior of spans whose rule carries a nested table. Each step asks every rule's
//! probe for its next match at or after the cursor and keeps the best one:
//!
//!   - the earliest token start wins;
//!   - on equal starts the rule declared first wins,
//!   - unless a later greedy rule matched a longer span and the current winner is not greedy.
//!
//! The winner is emitted, the cursor jumps to its end, and the loop repeats until no rule has a
//! match left. Text between spans is plain and never emitted.

use super::category::TokenCategory;
use super::rule::{Probe, Rule, RuleMatch};
use super::table::RuleTable;
use serde::Serialize;
use std::iter::FusedIterator;
use std::ops::Range;
use tracing::trace;

/// A classified region of the input. Offsets are bytes into the text handed to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedSpan {
    pub category: TokenCategory,
    pub start: usize,
    pub end: usize,
    /// Spans found by the rule's nested table, in the same coordinates as the parent.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ClassifiedSpan>,
}

impl ClassifiedSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered text. Empty if `source` is not the text this span was produced from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range()).unwrap_or_default()
    }
}

/// Lazy iterator over the top-level spans of one text.
pub struct Spans<'t> {
    table: &'t RuleTable,
    text: &'t str,
    offset: usize,
    cursor: usize,
    probes: Vec<Probe>,
    done: bool,
}

impl<'t> Spans<'t> {
    pub(crate) fn new(table: &'t RuleTable, text: &'t str) -> Self {
        Self::with_offset(table, text, 0)
    }

    /// Scan `text` as if it started at `offset` in some larger buffer.
    fn with_offset(table: &'t RuleTable, text: &'t str, offset: usize) -> Self {
        Self {
            table,
            text,
            offset,
            cursor: 0,
            probes: table.rules().map(|_| Probe::default()).collect(),
            done: false,
        }
    }

    fn select(&mut self) -> Option<(&'t Rule, RuleMatch)> {
        let table = self.table;
        let mut best: Option<(&'t Rule, RuleMatch)> = None;

        for (rule, probe) in table.rules().zip(self.probes.iter_mut()) {
            let Some(found) = probe.next_match(rule, self.text, self.cursor) else {
                continue;
            };

            let wins = match best {
                None => true,
                Some((held_rule, held)) => {
                    found.start < held.start
                        || (found.start == held.start
                            && rule.is_greedy()
                            && !held_rule.is_greedy()
                            && found.end > held.end)
                }
            };
            if wins {
                best = Some((rule, found));
            }
        }

        best
    }
}

impl<'t> Iterator for Spans<'t> {
    type Item = ClassifiedSpan;

    fn next(&mut self) -> Option<ClassifiedSpan> {
        if self.done {
            return None;
        }

        let Some((rule, found)) = self.select() else {
            self.done = true;
            return None;
        };
        self.cursor = found.end;

        let text = self.text;
        let children = match rule.nested() {
            Some(nested) => Spans::with_offset(
                nested,
                &text[found.start..found.end],
                self.offset + found.start,
            )
            .collect(),
            None => Vec::new(),
        };

        let span = ClassifiedSpan {
            category: rule.category(),
            start: self.offset + found.start,
            end: self.offset + found.end,
            children,
        };
        trace!(
            category = %span.category,
            start = span.start,
            end = span.end,
            "classified span"
        );
        Some(span)
    }
}

impl FusedIterator for Spans<'_> {}

/// A piece of the source: either plain text or a classified span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(Range<usize>),
    Token(&'a ClassifiedSpan),
}

impl Segment<'_> {
    pub fn range(&self) -> Range<usize> {
        match self {
            Segment::Plain(range) => range.clone(),
            Segment::Token(span) => span.range(),
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range()).unwrap_or_default()
    }
}

/// Interleave `spans` with the plain gaps around them, covering all of `source`.
pub fn segments<'a>(source: &str, spans: &'a [ClassifiedSpan]) -> Vec<Segment<'a>> {
    segments_in(0..source.len(), spans)
}

/// Same as [segments], restricted to `range` (used for a span's children).
pub(crate) fn segments_in(range: Range<usize>, spans: &[ClassifiedSpan]) -> Vec<Segment<'_>> {
    let mut out = Vec::with_capacity(spans.len() * 2 + 1);
    let mut at = range.start;

    for span in spans {
        if span.start > at {
            out.push(Segment::Plain(at..span.start));
        }
        out.push(Segment::Token(span));
        at = span.end;
    }
    if at < range.end {
        out.push(Segment::Plain(at..range.end));
    }

    out
}

/// Depth-first walk: every span, followed by its children.
pub fn flatten(spans: &[ClassifiedSpan]) -> Vec<&ClassifiedSpan> {
    let mut out = Vec::new();
    let mut stack: Vec<&ClassifiedSpan> = spans.iter().rev().collect();
    while let Some(span) = stack.pop() {
        out.push(span);
        stack.extend(span.children.iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::rule::RuleSpec;

    fn table(rules: Vec<(TokenCategory, RuleSpec)>) -> RuleTable {
        rules
            .into_iter()
            .fold(RuleTable::builder(), |builder, (category, spec)| {
                builder.rule(category, spec)
            })
            .build()
            .unwrap()
    }

    fn categories(table: &RuleTable, text: &str) -> Vec<(TokenCategory, String)> {
        table
            .classify(text)
            .map(|span| (span.category, span.text(text).to_string()))
            .collect()
    }

    #[test]
    fn test_earliest_start_wins_over_priority() {
        let table = table(vec![
            (TokenCategory::Keyword, RuleSpec::new("if")),
            (TokenCategory::Number, RuleSpec::new("[0-9]+")),
        ]);
        assert_eq!(
            categories(&table, "1 if"),
            vec![
                (TokenCategory::Number, "1".to_string()),
                (TokenCategory::Keyword, "if".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let table = table(vec![
            (TokenCategory::Keyword, RuleSpec::new("true")),
            (TokenCategory::Boolean, RuleSpec::new("true")),
        ]);
        assert_eq!(
            categories(&table, "true"),
            vec![(TokenCategory::Keyword, "true".to_string())]
        );
    }

    #[test]
    fn test_greedy_rule_preempts_shorter_match() {
        let table = table(vec![
            (TokenCategory::Operator, RuleSpec::new("/")),
            (TokenCategory::Comment, RuleSpec::new("//.*").greedy()),
        ]);
        assert_eq!(
            categories(&table, "// note"),
            vec![(TokenCategory::Comment, "// note".to_string())]
        );
    }

    #[test]
    fn test_non_greedy_rule_does_not_preempt() {
        let table = table(vec![
            (TokenCategory::Operator, RuleSpec::new("/")),
            (TokenCategory::Comment, RuleSpec::new("//.*")),
        ]);
        assert_eq!(
            categories(&table, "//"),
            vec![
                (TokenCategory::Operator, "/".to_string()),
                (TokenCategory::Operator, "/".to_string()),
            ]
        );
    }

    #[test]
    fn test_greedy_does_not_preempt_greedy() {
        let table = table(vec![
            (TokenCategory::String, RuleSpec::new("'a").greedy()),
            (TokenCategory::Comment, RuleSpec::new("'a'").greedy()),
        ]);
        assert_eq!(
            categories(&table, "'a'"),
            vec![(TokenCategory::String, "'a".to_string())]
        );
    }

    #[test]
    fn test_nested_children_use_absolute_offsets() {
        let punctuation = table(vec![(TokenCategory::Punctuation, RuleSpec::new(r"\."))]);
        let table = table(vec![(
            TokenCategory::ClassName,
            RuleSpec::new(r"(new\s+)[\w.]+")
                .lookbehind()
                .nested(punctuation),
        )]);
        let spans: Vec<_> = table.classify("x = new a.b").collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range(), 8..11);
        assert_eq!(spans[0].children.len(), 1);
        assert_eq!(spans[0].children[0].range(), 9..10);
    }

    #[test]
    fn test_nested_rules_cannot_see_outside_parent() {
        let inner = table(vec![(TokenCategory::Punctuation, RuleSpec::new(r"(^)x").lookbehind())]);
        let table = table(vec![(
            TokenCategory::String,
            RuleSpec::new("\"[^\"]*\"").nested(inner),
        )]);
        // inside the string, `^` is the string's own start, which is the quote, not an x
        let spans: Vec<_> = table.classify("x\"x\"").collect();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].children.is_empty());
    }

    #[test]
    fn test_segments_cover_source() {
        let table = table(vec![(TokenCategory::Number, RuleSpec::new("[0-9]+"))]);
        let source = "a 12 b 3";
        let spans: Vec<_> = table.classify(source).collect();
        let segments = segments(source, &spans);
        let texts: Vec<_> = segments.iter().map(|segment| segment.text(source)).collect();
        assert_eq!(texts, vec!["a ", "12", " b ", "3"]);
        assert!(matches!(segments[1], Segment::Token(_)));
    }

    #[test]
    fn test_flatten_is_depth_first() {
        let leaf = |start| ClassifiedSpan {
            category: TokenCategory::Punctuation,
            start,
            end: start + 1,
            children: vec![],
        };
        let spans = vec![
            ClassifiedSpan {
                category: TokenCategory::ClassName,
                start: 0,
                end: 5,
                children: vec![leaf(1), leaf(3)],
            },
            leaf(6),
        ];
        let starts: Vec<_> = flatten(&spans).iter().map(|span| span.start).collect();
        assert_eq!(starts, vec![0, 1, 3, 6]);
    }

    #[test]
    fn test_lazy_iteration_stops_early() {
        let table = table(vec![(TokenCategory::Number, RuleSpec::new("[0-9]"))]);
        let mut spans = table.classify("1 2 3");
        assert_eq!(spans.next().map(|span| span.start), Some(0));
        assert_eq!(spans.next().map(|span| span.start), Some(2));
    }
}
