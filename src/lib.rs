//! Preference-ranked MiniCon rewriting of conjunctive queries using views.
//!
//! A query and a set of views are conjunctive rules over the same
//! predicates. The engine enumerates combinations of views that answer the
//! query, visiting higher-ranked views first and stopping once the requested
//! number of rewritings is found.

pub mod api;
pub mod batch;
pub mod binding;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod mcd;
pub mod metrics;
pub mod parser;
pub mod predicate;
pub mod preferences;
pub mod record;
pub mod rewrite;
pub mod symbol;
pub mod trace;

pub use api::Engine;
pub use config::EngineConfig;
pub use coverage::{build_coverage_index, CoverageIndex};
pub use mcd::{Mcd, McdCache};
pub use predicate::{Element, Predicate};
pub use preferences::Preferences;
pub use record::{Query, Rank, Record, SubgoalId, View, ViewId};
pub use rewrite::{enumerate_rewritings, Enumeration, Rewriting};
pub use symbol::SymbolStore;

#[cfg(test)]
pub(crate) mod test_utils;
