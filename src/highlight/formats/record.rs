//! Serializable view of classified spans, shared by the json and yaml formats.

use crate::highlight::category::TokenCategory;
use crate::highlight::classify::ClassifiedSpan;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanRecord<'s> {
    pub category: TokenCategory,
    pub start: usize,
    pub end: usize,
    pub text: &'s str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SpanRecord<'s>>,
}

/// Attach the covered text to every span, recursively.
pub fn records<'s>(source: &'s str, spans: &[ClassifiedSpan]) -> Vec<SpanRecord<'s>> {
    spans
        .iter()
        .map(|span| SpanRecord {
            category: span.category,
            start: span.start,
            end: span.end,
            text: span.text(source),
            children: records(source, &span.children),
        })
        .collect()
}
