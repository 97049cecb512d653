//! Public API for preference-ranked query rewriting.
//!
//! `Engine` ties together the symbol store, the configuration, the parser
//! and the enumerator.

use crate::config::EngineConfig;
use crate::coverage::build_coverage_index;
use crate::parser::{parse_program, parse_rule, ParseError, Program};
use crate::preferences::Preferences;
use crate::record::{Query, Record, View};
use crate::rewrite::{dedup_rewritings, format_rewriting, Enumeration, Enumerator, Rewriting};
use crate::symbol::SymbolStore;
use crate::trace::{debug, info_span};

/// Rewriting engine.
///
/// Owns the symbol store every query and view it handles must be built
/// with.
pub struct Engine {
    symbols: SymbolStore,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            symbols: SymbolStore::new(),
            config,
        }
    }

    pub fn symbols(&self) -> &SymbolStore {
        &self.symbols
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parse_program(&self, text: &str) -> Result<Program, ParseError> {
        parse_program(&self.symbols, text)
    }

    pub fn parse_rule(&self, text: &str) -> Result<Record, ParseError> {
        parse_rule(&self.symbols, text)
    }

    /// Rank `views` from a preference document, falling back to the
    /// configured default rank. Returns how many views were named.
    pub fn apply_preferences(&self, views: &mut [View], prefs: &Preferences) -> usize {
        prefs.apply(views, &self.symbols, self.config.default_rank)
    }

    /// Enumerate rewritings of `query` as configured.
    pub fn rewrite<'q>(&self, query: &'q Query, views: &'q [View]) -> Enumeration<'q> {
        self.rewrite_with_cap(query, views, self.config.cap())
    }

    /// Enumerate at most `cap` rewritings, ignoring the configured count.
    pub fn rewrite_with_cap<'q>(
        &self,
        query: &'q Query,
        views: &'q [View],
        cap: usize,
    ) -> Enumeration<'q> {
        let _span = info_span!("rewrite", views = views.len()).entered();
        let index = build_coverage_index(query, views);
        let mut run = Enumerator::new(query, &index).run(cap);
        if self.config.dedup {
            run.rewritings = dedup_rewritings(run.rewritings);
            debug!(kept = run.rewritings.len(), "rewritings_deduplicated");
        }
        run
    }

    pub fn format_rewriting(&self, rewriting: &Rewriting<'_>, views: &[View]) -> Result<String, String> {
        format_rewriting(rewriting, views, &self.symbols)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/api.rs"]
mod tests;
