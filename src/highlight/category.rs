//! Token categories.
//!
//! The category names are the contract with renderers: stylesheets key on them literally, so
//! `as_str`, `Display`, `FromStr` and serde all use the same kebab-case spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenCategory {
    Comment,
    String,
    ClassName,
    Keyword,
    Boolean,
    Number,
    Operator,
    Punctuation,
}

impl TokenCategory {
    /// Returns the category name as renderers see it.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenCategory::Comment => "comment",
            TokenCategory::String => "string",
            TokenCategory::ClassName => "class-name",
            TokenCategory::Keyword => "keyword",
            TokenCategory::Boolean => "boolean",
            TokenCategory::Number => "number",
            TokenCategory::Operator => "operator",
            TokenCategory::Punctuation => "punctuation",
        }
    }
}

/// Every category, in grimoire table priority order.
pub const TOKEN_CATEGORIES: &[TokenCategory] = &[
    TokenCategory::Comment,
    TokenCategory::String,
    TokenCategory::ClassName,
    TokenCategory::Keyword,
    TokenCategory::Boolean,
    TokenCategory::Number,
    TokenCategory::Operator,
    TokenCategory::Punctuation,
];

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for TokenCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOKEN_CATEGORIES
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
