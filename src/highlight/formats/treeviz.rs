//! Tree view of classified spans.
//!
//! One line per span: connector, category, byte range, and the text as a Rust string literal so
//! newlines and quotes stay on one line.
//!
//! ```text
//! ├─ keyword 0..5 "class"
//! └─ class-name 6..13 "Foo.Bar"
//!    └─ punctuation 9..10 "."
//! ```

use super::registry::{FormatError, Formatter};
use crate::highlight::classify::ClassifiedSpan;

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, source: &str, spans: &[ClassifiedSpan]) -> Result<String, FormatError> {
        Ok(to_treeviz_str(source, spans))
    }

    fn description(&self) -> &str {
        "Indented span tree with byte ranges"
    }
}

pub fn to_treeviz_str(source: &str, spans: &[ClassifiedSpan]) -> String {
    let mut out = String::new();
    write_level(&mut out, source, spans, "");
    out
}

fn write_level(out: &mut String, source: &str, spans: &[ClassifiedSpan], prefix: &str) {
    for (i, span) in spans.iter().enumerate() {
        let last = i + 1 == spans.len();
        let connector = if last { "└─ " } else { "├─ " };
        out.push_str(&format!(
            "{prefix}{connector}{} {}..{} {:?}\n",
            span.category,
            span.start,
            span.end,
            span.text(source)
        ));

        let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });
        write_level(out, source, &span.children, &child_prefix);
    }
}
