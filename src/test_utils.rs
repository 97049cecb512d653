use crate::parser::{parse_program, parse_rule, Program};
use crate::record::Record;
use crate::symbol::SymbolStore;

pub(crate) fn setup() -> SymbolStore {
    SymbolStore::new()
}

/// Parse one rule, panicking on malformed test input.
pub(crate) fn rule(symbols: &SymbolStore, text: &str) -> Record {
    parse_rule(symbols, text).unwrap_or_else(|e| panic!("bad test rule {:?}: {}", text, e))
}

/// Parse a view with an explicit rank.
pub(crate) fn ranked(symbols: &SymbolStore, text: &str, rank: f64) -> Record {
    rule(symbols, text).with_rank(rank)
}

pub(crate) fn program(symbols: &SymbolStore, text: &str) -> Program {
    parse_program(symbols, text).unwrap_or_else(|e| panic!("bad test program: {}", e))
}
