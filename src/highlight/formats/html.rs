//! HTML span markup.
//!
//! Produces the source text with each classified span wrapped as
//! `<span class="token keyword">if</span>`, children nested inside their parent. Only the
//! markup for the snippet is produced; page structure and styles belong to the caller.

use super::registry::{FormatError, Formatter};
use crate::highlight::classify::{segments_in, ClassifiedSpan, Segment};
use std::ops::Range;

pub const DEFAULT_CLASS_PREFIX: &str = "token";

pub struct HtmlFormatter {
    class_prefix: String,
}

impl HtmlFormatter {
    /// Use `prefix` as the first class of every span. An empty prefix emits the category alone.
    pub fn with_class_prefix(prefix: impl Into<String>) -> Self {
        Self {
            class_prefix: prefix.into(),
        }
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::with_class_prefix(DEFAULT_CLASS_PREFIX)
    }
}

impl Formatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn serialize(&self, source: &str, spans: &[ClassifiedSpan]) -> Result<String, FormatError> {
        Ok(to_html(source, spans, &self.class_prefix))
    }

    fn description(&self) -> &str {
        "Source wrapped in <span> markup, one class per category"
    }
}

pub fn to_html(source: &str, spans: &[ClassifiedSpan], class_prefix: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    render(&mut out, source, 0..source.len(), spans, class_prefix);
    out
}

fn render(
    out: &mut String,
    source: &str,
    range: Range<usize>,
    spans: &[ClassifiedSpan],
    class_prefix: &str,
) {
    for segment in segments_in(range, spans) {
        match segment {
            Segment::Plain(range) => escape_into(out, &source[range]),
            Segment::Token(span) => {
                out.push_str("<span class=\"");
                if !class_prefix.is_empty() {
                    out.push_str(class_prefix);
                    out.push(' ');
                }
                out.push_str(span.category.as_str());
                out.push_str("\">");
                render(out, source, span.range(), &span.children, class_prefix);
                out.push_str("</span>");
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
