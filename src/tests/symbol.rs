use super::*;

#[test]
fn intern_same_string_returns_same_id() {
    let symbols = SymbolStore::new();
    let a = symbols.intern("p");
    let b = symbols.intern("p");
    assert_eq!(a, b, "Same name should intern to the same SymId");
}

#[test]
fn intern_different_strings_returns_different_ids() {
    let symbols = SymbolStore::new();
    assert_ne!(symbols.intern("p"), symbols.intern("q"));
}

#[test]
fn resolve_round_trips_name() {
    let symbols = SymbolStore::new();
    let id = symbols.intern("cites");
    assert_eq!(symbols.resolve(id), Some("cites"));
}

#[test]
fn get_does_not_intern() {
    let symbols = SymbolStore::new();
    assert_eq!(symbols.get("absent"), None);
    assert!(!symbols.contains("absent"));
    symbols.intern("present");
    assert!(symbols.get("present").is_some());
}

#[test]
fn fresh_vars_are_distinct_even_with_same_name() {
    let symbols = SymbolStore::new();
    let x1 = symbols.fresh_var("x");
    let x2 = symbols.fresh_var("x");
    assert_ne!(x1, x2, "Each fresh variable must get its own identity");
    assert_eq!(symbols.var_name(x1), Some("x"));
    assert_eq!(symbols.var_name(x2), Some("x"));
    assert_eq!(symbols.var_count(), 2);
}

#[test]
fn var_name_of_unknown_var_is_none() {
    let symbols = SymbolStore::new();
    let other = SymbolStore::new();
    let v = other.fresh_var("y");
    assert_eq!(symbols.var_name(v), None);
}

#[test]
fn concurrent_fresh_vars_never_collide() {
    use std::sync::Arc;
    use std::thread;

    let symbols = Arc::new(SymbolStore::new());
    let mut handles = vec![];
    for _ in 0..8 {
        let symbols = Arc::clone(&symbols);
        handles.push(thread::spawn(move || {
            (0..50).map(|_| symbols.fresh_var("v")).collect::<Vec<_>>()
        }));
    }

    let mut all: Vec<VarId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 400, "Concurrent allocations should all be distinct");
}
