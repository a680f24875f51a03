//! Rules: one regex pattern plus the flags that tell the classifier how to treat its matches.
//!
//! A [RuleSpec] is the declarative form (pattern source and flags). Compiling it against a
//! category yields a [Rule]. During a scan, every rule gets a [Probe] that remembers where the
//! rule's search stopped, so no rule ever re-reads text it already looked at.
//!
//! Delimited rules
//!
//!     A rule built with [RuleSpec::delimited] matches its opening pattern, then runs to the end
//!     of the first closing match after it, or to the end of the text if there is none. The
//!     probe remembers where the closer was last found, so openers sharing one closer (or
//!     sharing the lack of one) cost a single closer search between them.
//!
//! Leading context
//!
//!     The regex engine has no lookbehind, so rules that need to check what precedes them
//!     capture that text in group 1 and set `lookbehind`. The emitted span starts where group 1
//!     ends. The context is searched against the full haystack, so it may sit on text that an
//!     earlier span already claimed.

use super::category::TokenCategory;
use super::table::RuleTable;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RuleError {
    #[error("invalid {category} pattern '{pattern}': {source}")]
    InvalidPattern {
        category: TokenCategory,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{category} pattern '{pattern}' is marked lookbehind but has no context group")]
    MissingContextGroup {
        category: TokenCategory,
        pattern: String,
    },
}

/// Declarative form of a rule.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pattern: String,
    close: Option<String>,
    lookbehind: bool,
    greedy: bool,
    case_insensitive: bool,
    nested: Option<Arc<RuleTable>>,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            close: None,
            lookbehind: false,
            greedy: false,
            case_insensitive: false,
            nested: None,
        }
    }

    /// `open`, then everything up to and including the first match of `close` after it.
    /// Without a closing match the rule runs to the end of the text. Flags apply to `open`;
    /// `case_insensitive` applies to both.
    pub fn delimited(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            close: Some(close.into()),
            ..Self::new(open)
        }
    }

    /// Treat capture group 1 as leading context, excluded from the emitted span.
    pub fn lookbehind(mut self) -> Self {
        self.lookbehind = true;
        self
    }

    /// Let a longer match of this rule preempt a non-greedy rule starting at the same place.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Re-classify every match of this rule with `table`.
    pub fn nested(mut self, table: RuleTable) -> Self {
        self.nested = Some(Arc::new(table));
        self
    }

    pub(crate) fn compile(self, category: TokenCategory) -> Result<Rule, RuleError> {
        let regex = build_regex(&self.pattern, self.case_insensitive, category)?;
        let close = self
            .close
            .as_deref()
            .map(|close| build_regex(close, self.case_insensitive, category))
            .transpose()?;

        // captures_len counts the implicit whole-match group
        if self.lookbehind && regex.captures_len() < 2 {
            return Err(RuleError::MissingContextGroup {
                category,
                pattern: self.pattern,
            });
        }

        Ok(Rule {
            category,
            pattern: self.pattern,
            regex,
            close,
            lookbehind: self.lookbehind,
            greedy: self.greedy,
            case_insensitive: self.case_insensitive,
            nested: self.nested,
        })
    }
}

fn build_regex(
    pattern: &str,
    case_insensitive: bool,
    category: TokenCategory,
) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            category,
            pattern: pattern.to_string(),
            source,
        })
}

/// A compiled rule, owned by exactly one category.
#[derive(Debug, Clone)]
pub struct Rule {
    category: TokenCategory,
    pattern: String,
    regex: Regex,
    close: Option<Regex>,
    lookbehind: bool,
    greedy: bool,
    case_insensitive: bool,
    nested: Option<Arc<RuleTable>>,
}

impl Rule {
    pub fn category(&self) -> TokenCategory {
        self.category
    }

    /// The pattern source as declared (the opening pattern of a delimited rule).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The closing pattern of a delimited rule.
    pub fn closing_pattern(&self) -> Option<&str> {
        self.close.as_ref().map(Regex::as_str)
    }

    pub fn is_lookbehind(&self) -> bool {
        self.lookbehind
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn nested(&self) -> Option<&RuleTable> {
        self.nested.as_deref()
    }

    /// Leftmost match whose context starts at or after `from`.
    fn match_at(
        &self,
        text: &str,
        from: usize,
        close_memo: &mut Option<CloseMemo>,
    ) -> Option<RuleMatch> {
        let captures = self.regex.captures_at(text, from)?;
        let whole = captures.get(0)?;
        let start = if self.lookbehind {
            captures
                .get(1)
                .map_or(whole.start(), |context| context.end())
        } else {
            whole.start()
        };

        let end = match &self.close {
            Some(close) => close_end(close, text, whole.end(), close_memo),
            None => whole.end(),
        };

        Some(RuleMatch {
            context_start: whole.start(),
            start,
            end,
        })
    }
}

/// Result of the last closer search of a delimited rule: searching from `from` found the
/// closer at `found`, or nothing up to the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CloseMemo {
    from: usize,
    found: Option<(usize, usize)>,
}

/// End of the first `close` match at or after `from`, or the end of the text.
fn close_end(close: &Regex, text: &str, from: usize, memo: &mut Option<CloseMemo>) -> usize {
    if let Some(last) = *memo {
        if from >= last.from {
            match last.found {
                None => return text.len(),
                Some((start, end)) if start >= from => return end,
                Some(_) => {}
            }
        }
    }

    let found = close.find_at(text, from).map(|m| (m.start(), m.end()));
    *memo = Some(CloseMemo { from, found });
    found.map_or(text.len(), |(_, end)| end)
}

/// Byte offsets of one rule match. `start..end` is the token, `context_start..start` the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleMatch {
    pub context_start: usize,
    pub start: usize,
    pub end: usize,
}

/// Per-scan search state for one rule.
///
/// The cursor handed to [Probe::next_match] must never move backwards.
#[derive(Debug, Default)]
pub(crate) struct Probe {
    search_from: usize,
    pending: Option<RuleMatch>,
    close_memo: Option<CloseMemo>,
    exhausted: bool,
}

impl Probe {
    /// First non-empty match of `rule` whose token starts at or after `cursor`.
    pub(crate) fn next_match(
        &mut self,
        rule: &Rule,
        text: &str,
        cursor: usize,
    ) -> Option<RuleMatch> {
        if let Some(pending) = self.pending {
            if pending.start >= cursor {
                return Some(pending);
            }
            self.pending = None;
        }

        while !self.exhausted {
            // without leading context a token starts where its match does
            if !rule.is_lookbehind() {
                self.search_from = self.search_from.max(cursor);
            }
            if self.search_from > text.len() {
                self.exhausted = true;
                break;
            }

            let Some(found) = rule.match_at(text, self.search_from, &mut self.close_memo) else {
                self.exhausted = true;
                break;
            };

            self.search_from = next_char_boundary(text, found.context_start);
            if found.start >= cursor && found.end > found.start {
                self.pending = Some(found);
                return Some(found);
            }
        }

        None
    }
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(at + 1, |c| at + c.len_utf8())
}
