//! The grimoire rule tables.
//!
//! Two definitions of the table are in circulation. They agree on comments, strings, class
//! names, booleans and punctuation, and differ in three places:
//!
//! | rule     | V1                                   | V2                                          |
//! |----------|--------------------------------------|---------------------------------------------|
//! | keyword  | has `export`                         | has `public` instead                        |
//! | number   | optional `f`/`u` suffix, no exponent | optional exponent, then `f`/`d`/`l`/`u`     |
//! | operator | has `@`                              | no `@`                                      |
//!
//! V1 is the published definition and the default.
//!
//! # Table order
//!
//! 1. comment - block (unterminated runs to end of input), then line (greedy)
//! 2. string - double or single quoted, backslash escapes, greedy
//! 3. class-name - identifier after a declaring keyword, nested punctuation
//! 4. keyword
//! 5. boolean - shadowed by keyword, which lists `true`/`false` too
//! 6. number
//! 7. operator
//! 8. punctuation

use super::category::TokenCategory;
use super::rule::{RuleError, RuleSpec};
use super::table::RuleTable;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVariant {
    #[default]
    V1,
    V2,
}

pub const LANGUAGE_VARIANTS: &[LanguageVariant] = &[LanguageVariant::V1, LanguageVariant::V2];

impl LanguageVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageVariant::V1 => "v1",
            LanguageVariant::V2 => "v2",
        }
    }

    /// The process-wide table for this variant, compiled on first use.
    pub fn table(self) -> &'static RuleTable {
        match self {
            LanguageVariant::V1 => &V1_TABLE,
            LanguageVariant::V2 => &V2_TABLE,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            LanguageVariant::V1 => V1_KEYWORDS,
            LanguageVariant::V2 => V2_KEYWORDS,
        }
    }

    fn number_pattern(self) -> &'static str {
        match self {
            LanguageVariant::V1 => V1_NUMBER,
            LanguageVariant::V2 => V2_NUMBER,
        }
    }

    fn operator_pattern(self) -> &'static str {
        match self {
            LanguageVariant::V1 => V1_OPERATOR,
            LanguageVariant::V2 => V2_OPERATOR,
        }
    }
}

impl fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language variant '{0}' (expected v1 or v2)")]
pub struct UnknownVariant(pub String);

impl FromStr for LanguageVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LANGUAGE_VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

static V1_TABLE: Lazy<RuleTable> = Lazy::new(|| {
    build_table(LanguageVariant::V1).expect("grimoire v1 patterns are valid")
});

static V2_TABLE: Lazy<RuleTable> = Lazy::new(|| {
    build_table(LanguageVariant::V2).expect("grimoire v2 patterns are valid")
});

/// Block comment opener. Runs to the first closer, or to end of input when unterminated.
const BLOCK_COMMENT_OPEN: &str = r"(^|[^\\])/\*";

const BLOCK_COMMENT_CLOSE: &str = r"\*/";

/// Line comment. Not after `\`, and not after `:` even with blanks in between, so scoped
/// access like `a::b` and `key: //x` stay out of comments. A blank is any whitespace except a
/// line break.
const LINE_COMMENT: &str = r"(^[^\S\r\n]*|[\r\n][^\S\r\n]*|[^\\:\s]|[^:\s][^\S\r\n]+)//[^\r\n\x{2028}\x{2029}]*";

/// Quoted string; a quote only closes a string opened by the same quote.
const STRING: &str = concat!(
    r#""(?:\\(?:\r\n|(?s:.))|[^"\\\r\n])*""#,
    "|",
    r#"'(?:\\(?:\r\n|(?s:.))|[^'\\\r\n])*'"#,
);

/// The name itself is ASCII only, while `\b` and `\s` in the context are Unicode.
const CLASS_NAME: &str = r"((?:\b(?:class|interface|extends|implements|trait|instanceof|new)\s+)|(?:catch\s+\())[A-Za-z0-9_.\\]+";

const CLASS_NAME_PUNCTUATION: &str = r"[.\\]";

const BOOLEAN: &str = r"\b(?:true|false)\b";

const V1_NUMBER: &str =
    r"\b0[xbo][0-9a-f_]+\b|(?:\b[0-9][0-9_]*\.?[0-9_]*|\B\.[0-9][0-9_]*)[fu]?";

const V2_NUMBER: &str = r"\b0[xbo][0-9a-f_]+\b|(?:\b[0-9][0-9_]*\.?[0-9_]*|\B\.[0-9][0-9_]*)(?:e[+-]?[0-9][0-9_]*)?[fdlu]?";

const V1_OPERATOR: &str = r"@|--?|\+\+?|!=?=?|<=?|>=?|==?=?|&&?|\|\|?|\?=??|\*\*?|/|~|\^|%";

const V2_OPERATOR: &str = r"--?|\+\+?|!=?=?|<=?|>=?|==?=?|&&?|\|\|?|\?=??|\*\*?|/|~|\^|%";

const PUNCTUATION: &str = r"[{}\[\];(),.:]";

const V1_KEYWORDS: &[&str] = &[
    "import", "export", "alias", "event", "class", "enum", "where", "if", "unless", "else",
    "switch", "select", "case", "default", "while", "do", "until", "for", "loop", "return",
    "self", "die", "exit", "yield", "break", "continue", "as", "try", "catch", "throw", "defer",
    "void", "task", "func", "int", "uint", "char", "float", "bool", "string", "list", "channel",
    "var", "const", "pure", "true", "false", "null", "not", "and", "or", "bit_not", "bit_and",
    "bit_or", "bit_xor",
];

const V2_KEYWORDS: &[&str] = &[
    "import", "public", "alias", "event", "class", "enum", "where", "if", "unless", "else",
    "switch", "select", "case", "default", "while", "do", "until", "for", "loop", "return",
    "self", "die", "exit", "yield", "break", "continue", "as", "try", "catch", "throw", "defer",
    "void", "task", "func", "int", "uint", "char", "float", "bool", "string", "list", "channel",
    "var", "const", "pure", "true", "false", "null", "not", "and", "or", "bit_not", "bit_and",
    "bit_or", "bit_xor",
];

fn keyword_pattern(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

/// Compile the grimoire table for `variant`.
///
/// Callers normally want [LanguageVariant::table], which caches the result.
pub fn build_table(variant: LanguageVariant) -> Result<RuleTable, RuleError> {
    let class_name_inside = RuleTable::builder()
        .rule(TokenCategory::Punctuation, RuleSpec::new(CLASS_NAME_PUNCTUATION))
        .build()?;

    RuleTable::builder()
        .rules(
            TokenCategory::Comment,
            [
                RuleSpec::delimited(BLOCK_COMMENT_OPEN, BLOCK_COMMENT_CLOSE).lookbehind(),
                RuleSpec::new(LINE_COMMENT).lookbehind().greedy(),
            ],
        )
        .rule(TokenCategory::String, RuleSpec::new(STRING).greedy())
        .rule(
            TokenCategory::ClassName,
            RuleSpec::new(CLASS_NAME)
                .lookbehind()
                .case_insensitive()
                .nested(class_name_inside),
        )
        .rule(
            TokenCategory::Keyword,
            RuleSpec::new(keyword_pattern(variant.keywords())),
        )
        .rule(TokenCategory::Boolean, RuleSpec::new(BOOLEAN))
        .rule(
            TokenCategory::Number,
            RuleSpec::new(variant.number_pattern()).case_insensitive(),
        )
        .rule(
            TokenCategory::Operator,
            RuleSpec::new(variant.operator_pattern()),
        )
        .rule(TokenCategory::Punctuation, RuleSpec::new(PUNCTUATION))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::category::TOKEN_CATEGORIES;
    use rstest::rstest;

    fn tokens(variant: LanguageVariant, text: &str) -> Vec<(TokenCategory, String)> {
        variant
            .table()
            .classify(text)
            .map(|span| (span.category, span.text(text).to_string()))
            .collect()
    }

    #[test]
    fn test_both_variants_compile() {
        for variant in LANGUAGE_VARIANTS {
            assert!(build_table(*variant).is_ok());
        }
    }

    #[test]
    fn test_table_declares_every_category_in_order() {
        let categories: Vec<_> = LanguageVariant::V1.table().categories().collect();
        assert_eq!(categories, TOKEN_CATEGORIES.to_vec());
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("v2".parse::<LanguageVariant>(), Ok(LanguageVariant::V2));
        assert_eq!("V1".parse::<LanguageVariant>(), Ok(LanguageVariant::V1));
        assert!("v3".parse::<LanguageVariant>().is_err());
        assert_eq!(LanguageVariant::default(), LanguageVariant::V1);
    }

    #[rstest]
    #[case(LanguageVariant::V1, "export", Some(TokenCategory::Keyword))]
    #[case(LanguageVariant::V1, "public", None)]
    #[case(LanguageVariant::V2, "export", None)]
    #[case(LanguageVariant::V2, "public", Some(TokenCategory::Keyword))]
    #[case(LanguageVariant::V1, "import", Some(TokenCategory::Keyword))]
    #[case(LanguageVariant::V2, "import", Some(TokenCategory::Keyword))]
    fn test_keyword_sets_differ(
        #[case] variant: LanguageVariant,
        #[case] word: &str,
        #[case] expected: Option<TokenCategory>,
    ) {
        let found = tokens(variant, word).first().map(|(category, _)| *category);
        assert_eq!(found, expected);
    }

    #[rstest]
    #[case(LanguageVariant::V1, "@", vec![(TokenCategory::Operator, "@")])]
    #[case(LanguageVariant::V2, "@", vec![])]
    #[case(LanguageVariant::V1, "1e5", vec![(TokenCategory::Number, "1")])]
    #[case(LanguageVariant::V2, "1e5", vec![(TokenCategory::Number, "1e5")])]
    #[case(LanguageVariant::V2, "2.5E-3d", vec![(TokenCategory::Number, "2.5E-3d")])]
    #[case(LanguageVariant::V1, "2.5d", vec![(TokenCategory::Number, "2.5")])]
    #[case(LanguageVariant::V1, "1.5F", vec![(TokenCategory::Number, "1.5F")])]
    #[case(LanguageVariant::V2, "10L", vec![(TokenCategory::Number, "10L")])]
    fn test_variant_specific_rules(
        #[case] variant: LanguageVariant,
        #[case] text: &str,
        #[case] expected: Vec<(TokenCategory, &str)>,
    ) {
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(category, text)| (category, text.to_string()))
            .collect();
        assert_eq!(tokens(variant, text), expected);
    }

    #[test]
    fn test_booleans_are_claimed_by_keyword() {
        assert_eq!(
            tokens(LanguageVariant::V1, "true"),
            vec![(TokenCategory::Keyword, "true".to_string())]
        );
    }

    #[test]
    fn test_tables_are_shared() {
        assert!(std::ptr::eq(
            LanguageVariant::V2.table(),
            LanguageVariant::V2.table()
        ));
    }
}
