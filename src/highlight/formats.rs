//! Output formats for classified spans
//!
//! Each format implements [Formatter] and is looked up by name through [FormatRegistry]:
//! - `json`, `yaml`: span records with category, byte range, text and children
//! - `html`: the source with every span wrapped in a `<span class="token ...">`
//! - `treeviz`: an indented tree, one span per line

pub mod html;
pub mod json;
pub mod record;
pub mod registry;
pub mod treeviz;
pub mod yaml;

pub use html::{to_html, HtmlFormatter};
pub use json::JsonFormatter;
pub use record::{records, SpanRecord};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
pub use yaml::YamlFormatter;
