//! Ordered rule tables.
//!
//! A table maps categories to their rules. Declaration order is priority order: the first
//! category declared is tried first, and within a category its alternatives are tried in the
//! order they were added. Declaring more rules for a category that already has an entry appends
//! to that entry, so a category's priority is fixed by its first declaration.

use super::category::TokenCategory;
use super::classify::Spans;
use super::rule::{Rule, RuleError, RuleSpec};
use tracing::debug;

/// One category and its alternatives.
#[derive(Debug, Clone)]
pub struct TableEntry {
    category: TokenCategory,
    rules: Vec<Rule>,
}

impl TableEntry {
    pub fn category(&self) -> TokenCategory {
        self.category
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// An immutable, ordered set of classification rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    entries: Vec<TableEntry>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// All rules in priority order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.entries.iter().flat_map(|entry| entry.rules.iter())
    }

    /// Categories in priority order.
    pub fn categories(&self) -> impl Iterator<Item = TokenCategory> + '_ {
        self.entries.iter().map(|entry| entry.category)
    }

    /// Number of rules (not categories).
    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A table holding only `category`'s rules, or `None` if the category has no entry.
    pub fn subset(&self, category: TokenCategory) -> Option<RuleTable> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| RuleTable {
                entries: vec![entry.clone()],
            })
    }

    /// Lazily classify `text`.
    ///
    /// The returned iterator yields top-level spans left to right; each span's nested
    /// children are already resolved when it is yielded.
    pub fn classify<'t>(&'t self, text: &'t str) -> Spans<'t> {
        debug!(bytes = text.len(), rules = self.len(), "classifying text");
        Spans::new(self, text)
    }
}

/// Collects rule specs in declaration order and compiles them into a [RuleTable].
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    entries: Vec<(TokenCategory, Vec<RuleSpec>)>,
}

impl RuleTableBuilder {
    /// Add one alternative for `category`.
    pub fn rule(mut self, category: TokenCategory, spec: RuleSpec) -> Self {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, specs)) => specs.push(spec),
            None => self.entries.push((category, vec![spec])),
        }
        self
    }

    /// Add several alternatives for `category`, tried in the given order.
    pub fn rules(
        mut self,
        category: TokenCategory,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> Self {
        for spec in specs {
            self = self.rule(category, spec);
        }
        self
    }

    pub fn build(self) -> Result<RuleTable, RuleError> {
        let entries = self
            .entries
            .into_iter()
            .map(|(category, specs)| -> Result<TableEntry, RuleError> {
                let rules = specs
                    .into_iter()
                    .map(|spec| spec.compile(category))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TableEntry { category, rules })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = RuleTable { entries };
        debug!(
            categories = table.entries.len(),
            rules = table.len(),
            "compiled rule table"
        );
        Ok(table)
    }
}
