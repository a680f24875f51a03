//! Pattern-table highlighting for grimoire source text.
//!
//!     The whole system is a table. Each entry maps a [TokenCategory] to one or more regex
//!     rules, and the table order is the match priority. The [classify](classify::Spans) driver
//!     walks a text buffer, asks every rule for its next match, and emits the winner as a
//!     [ClassifiedSpan]. Nothing else happens: there is no parser, no tree beyond the nested
//!     spans, and no error path. Text that no rule recognizes is simply left plain.
//!
//! Priority
//!
//!     The earliest match start wins. On a tie, the rule declared first wins, except that a
//!     greedy rule with a longer match preempts a non-greedy one. Rules may carry a leading
//!     context group (lookbehind): the context must be present for the rule to match but is
//!     not part of the emitted span, and it may overlap text that was already classified.
//!
//! Nesting
//!
//!     A rule may own a nested [RuleTable]. Its matches are re-classified with that table,
//!     looking only inside the matched span. The same driver handles both levels.
//!
//! Variants
//!
//!     Two definitions of the grimoire table exist and they disagree on keywords, numbers and
//!     operators. Both are available through [LanguageVariant]; see [grimoire] for the details.

pub mod category;
pub mod classify;
pub mod config;
pub mod formats;
pub mod grimoire;
pub mod rule;
pub mod table;
pub mod testing;

pub use category::TokenCategory;
pub use classify::{flatten, segments, ClassifiedSpan, Segment, Spans};
pub use grimoire::LanguageVariant;
pub use rule::{Rule, RuleError, RuleSpec};
pub use table::{RuleTable, RuleTableBuilder};

/// Classify `text` with the default grimoire table.
///
/// Shorthand for `LanguageVariant::default().table().classify(text).collect()`.
pub fn classify(text: &str) -> Vec<ClassifiedSpan> {
    LanguageVariant::default().table().classify(text).collect()
}
