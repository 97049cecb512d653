use super::*;
use crate::rewrite::enumerate_rewritings;
use crate::test_utils::{rule, setup};

fn views(symbols: &crate::symbol::SymbolStore) -> Vec<View> {
    vec![
        rule(symbols, "A(x) :- p(x)"),
        rule(symbols, "B(x) :- p(x)"),
        rule(symbols, "C(y) :- r(y)"),
    ]
}

#[test]
fn results_come_back_in_job_order() {
    let symbols = setup();
    let views = views(&symbols);
    let queries = vec![
        rule(&symbols, "Q1(x) :- p(x)"),
        rule(&symbols, "Q2(y) :- r(y)"),
        rule(&symbols, "Q3(x) :- missing(x)"),
        rule(&symbols, "Q4(x, y) :- p(x), r(y)"),
    ];
    let jobs: Vec<Job<'_>> = queries.iter().map(|q| Job::new(q, &views)).collect();

    let results = rewrite_batch(&jobs, usize::MAX, 3);
    let counts: Vec<usize> = results.iter().map(|r| r.rewritings.len()).collect();
    assert_eq!(counts, vec![2, 1, 0, 2]);

    for (run, query) in results.iter().zip(&queries) {
        for rw in &run.rewritings {
            assert!(std::ptr::eq(rw.query(), query));
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    let symbols = setup();
    let views = views(&symbols);
    let queries: Vec<Query> = (0..8)
        .map(|i| rule(&symbols, &format!("Q{}(x, y) :- p(x), r(y)", i)))
        .collect();
    let jobs: Vec<Job<'_>> = queries.iter().map(|q| Job::new(q, &views)).collect();

    let parallel = rewrite_batch(&jobs, usize::MAX, 4);
    assert_eq!(parallel.len(), queries.len());
    for (run, query) in parallel.iter().zip(&queries) {
        let index = build_coverage_index(query, &views);
        let sequential = enumerate_rewritings(query, &index, usize::MAX);
        assert_eq!(run.rewritings.len(), sequential.len());
        for (a, b) in run.rewritings.iter().zip(&sequential) {
            assert!(a.same_as(b));
        }
    }
}

#[test]
fn cap_applies_per_job() {
    let symbols = setup();
    let views = views(&symbols);
    let q1 = rule(&symbols, "Q1(x) :- p(x)");
    let q2 = rule(&symbols, "Q2(x) :- p(x)");
    let jobs = [Job::new(&q1, &views), Job::new(&q2, &views)];

    let results = rewrite_batch(&jobs, 1, 2);
    assert!(results.iter().all(|r| r.rewritings.len() == 1));
    assert!(results.iter().all(|r| r.metrics.cap_reached));
}

#[test]
fn empty_batch() {
    assert!(rewrite_batch(&[], 10, 4).is_empty());
}

#[test]
fn default_workers_is_positive() {
    assert!(default_workers() >= 1);
}
