//! Rank-ordered enumeration of rewritings.
//!
//! The search is depth-first. At each node it takes the first uncovered
//! subgoal (query order), walks that subgoal's candidate views from highest to
//! lowest rank, and for each MCD of (subgoal, view) recurses on what the MCD
//! leaves uncovered. A node with nothing left to cover is a complete
//! candidate; it is emitted if it passes `is_rewriting`.
//!
//! The requested count is the only bound. Reaching it returns
//! `ControlFlow::Break` which every level propagates straight back to the
//! caller.

use crate::coverage::CoverageIndex;
use crate::mcd::{Mcd, McdCache};
use crate::metrics::{MetricsReport, SearchMetrics};
use crate::predicate::{format_element, Element};
use crate::record::{Query, SubgoalId, View};
use crate::symbol::SymbolStore;
use crate::trace::{debug, debug_span, trace};
use smallvec::SmallVec;
use std::ops::ControlFlow;
use std::sync::Arc;

/// A complete, disjoint and consistent set of MCDs answering a query.
#[derive(Debug, Clone)]
pub struct Rewriting<'q> {
    query: &'q Query,
    mcds: Vec<Arc<Mcd>>,
}

impl<'q> Rewriting<'q> {
    /// The query this rewriting answers.
    pub fn query(&self) -> &'q Query {
        self.query
    }

    /// MCDs in the order the search chose them.
    pub fn mcds(&self) -> &[Arc<Mcd>] {
        &self.mcds
    }

    pub fn len(&self) -> usize {
        self.mcds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mcds.is_empty()
    }

    /// Same views covering the same subgoals with the same bindings.
    pub fn same_as(&self, other: &Rewriting<'_>) -> bool {
        self.mcds.len() == other.mcds.len()
            && self.mcds.iter().all(|a| other.mcds.iter().any(|b| a.same_cover(b)))
    }
}

/// Result of one enumeration run.
#[derive(Debug, Clone)]
pub struct Enumeration<'q> {
    pub rewritings: Vec<Rewriting<'q>>,
    pub metrics: MetricsReport,
}

/// Check a complete candidate.
///
/// - the covered counts add up to the number of query subgoals;
/// - MCDs are pairwise disjoint;
/// - no query element is bound to two different constants by two MCDs.
pub fn is_rewriting(mcds: &[Arc<Mcd>], query: &Query) -> bool {
    let covered: usize = mcds.iter().map(|m| m.number_of_subgoals()).sum();
    if covered != query.number_of_subgoals() {
        return false;
    }

    for (i, a) in mcds.iter().enumerate() {
        for b in &mcds[i + 1..] {
            if !a.is_disjoint(b) {
                return false;
            }
            if a.binding().conflicts_with(b.binding()) || b.binding().conflicts_with(a.binding()) {
                return false;
            }
        }
    }
    true
}

/// Depth-first rewriting search for one query.
///
/// Owns the MCD cache for the query, so nothing computed here leaks into
/// another query's search.
pub struct Enumerator<'q, 'i> {
    query: &'q Query,
    index: &'i CoverageIndex<'q>,
    cache: McdCache<'q>,
    metrics: SearchMetrics,
    found: Vec<Rewriting<'q>>,
    cap: usize,
}

impl<'q, 'i> Enumerator<'q, 'i> {
    pub fn new(query: &'q Query, index: &'i CoverageIndex<'q>) -> Self {
        debug_assert_eq!(
            index.subgoal_count(),
            query.number_of_subgoals(),
            "coverage index was built for a different query"
        );
        Self {
            query,
            index,
            cache: McdCache::new(query, index.views()),
            metrics: SearchMetrics::new(),
            found: Vec::new(),
            cap: 0,
        }
    }

    /// The query-scoped MCD cache.
    pub fn cache(&self) -> &McdCache<'q> {
        &self.cache
    }

    /// Run the search, stopping after `cap` rewritings.
    pub fn run(mut self, cap: usize) -> Enumeration<'q> {
        let _span = debug_span!("enumerate_rewritings", cap).entered();
        self.cap = cap;

        if cap > 0 {
            let remaining: SmallVec<[SubgoalId; 8]> = self.query.subgoal_ids().collect();
            let mut prefix: Vec<Arc<Mcd>> = Vec::with_capacity(remaining.len());
            if self.search(&mut prefix, &remaining).is_break() {
                self.metrics.record_cap_reached();
            }
        }

        let formation = self.cache.formation_stats();
        let metrics = self.metrics.report(
            self.cache.computations(),
            self.cache.hits(),
            formation.rejected,
        );
        debug!(
            emitted = self.found.len(),
            branches = metrics.branches,
            "enumeration_finished"
        );
        Enumeration {
            rewritings: self.found,
            metrics,
        }
    }

    fn search(&mut self, prefix: &mut Vec<Arc<Mcd>>, remaining: &[SubgoalId]) -> ControlFlow<()> {
        if self.found.len() >= self.cap {
            return ControlFlow::Break(());
        }
        self.metrics.record_branch(prefix.len());

        let Some(&first) = remaining.first() else {
            return self.complete(prefix);
        };

        let index = self.index;
        let views = index.ranked_views(first);
        if views.is_empty() {
            trace!(subgoal = first.index(), "subgoal_has_no_views");
        }

        // MCDs for a view are formed only when the search reaches that view.
        for &view in views {
            let mcds = self.cache.mcds_for(first, view);
            for mcd in mcds.iter() {
                let rest: SmallVec<[SubgoalId; 8]> = remaining
                    .iter()
                    .copied()
                    .filter(|s| !mcd.covers(*s))
                    .collect();
                prefix.push(Arc::clone(mcd));
                let flow = self.search(prefix, &rest);
                prefix.pop();
                if flow.is_break() {
                    return flow;
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn complete(&mut self, prefix: &[Arc<Mcd>]) -> ControlFlow<()> {
        let valid = is_rewriting(prefix, self.query);
        self.metrics.record_leaf(valid);
        if !valid {
            trace!(mcds = prefix.len(), "candidate_rejected");
            return ControlFlow::Continue(());
        }

        trace!(index = self.found.len(), "rewriting_emitted");
        self.found.push(Rewriting {
            query: self.query,
            mcds: prefix.to_vec(),
        });
        if self.found.len() >= self.cap {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Enumerate up to `cap` rewritings of `query`, highest-ranked views first.
pub fn enumerate_rewritings<'q>(
    query: &'q Query,
    index: &CoverageIndex<'q>,
    cap: usize,
) -> Vec<Rewriting<'q>> {
    Enumerator::new(query, index).run(cap).rewritings
}

/// Drop rewritings equal to an earlier one, keeping discovery order.
pub fn dedup_rewritings<'q>(rewritings: Vec<Rewriting<'q>>) -> Vec<Rewriting<'q>> {
    let mut kept: Vec<Rewriting<'q>> = Vec::with_capacity(rewritings.len());
    for rewriting in rewritings {
        if !kept.iter().any(|k| k.same_as(&rewriting)) {
            kept.push(rewriting);
        }
    }
    kept
}

/// Query elements a rewriting forces to be equal.
///
/// Two query elements bound to the same view variable within one MCD denote
/// the same value. Each class is represented by its constant if it has one,
/// otherwise by the element that entered the class first.
#[derive(Debug, Default)]
struct Equalities {
    parent: SmallVec<[(Element, Element); 8]>,
}

impl Equalities {
    fn of(rewriting: &Rewriting<'_>) -> Self {
        let mut eq = Equalities::default();
        for mcd in rewriting.mcds() {
            let vars = mcd.binding().variables();
            for (i, &(key, value)) in vars.iter().enumerate() {
                if let Some(&(first, _)) = vars[..i].iter().find(|(_, v)| *v == value) {
                    eq.union(first, key);
                }
            }
        }
        eq
    }

    fn find(&self, mut elem: Element) -> Element {
        while let Some(&(_, up)) = self.parent.iter().find(|(e, _)| *e == elem) {
            elem = up;
        }
        elem
    }

    fn union(&mut self, a: Element, b: Element) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if rb.is_const() && !ra.is_const() {
            self.parent.push((ra, rb));
        } else {
            self.parent.push((rb, ra));
        }
    }
}

/// Render a rewriting as `Q(x, y) :- V1(x), V2(y)`.
///
/// Each view head argument shows the query element bound to it, the constant
/// itself, or `_` when nothing in the query is bound to it. Query elements the
/// MCDs equate are shown by one representative, in the head as well as the
/// body, so `Q(x, y) :- p(x, y)` over `V(a) :- p(a, a)` renders as
/// `Q(x, x) :- V(x)`.
pub fn format_rewriting(
    rewriting: &Rewriting<'_>,
    views: &[View],
    symbols: &SymbolStore,
) -> Result<String, String> {
    let query = rewriting.query();
    let query_name = symbols
        .resolve(query.name())
        .ok_or_else(|| format!("Unknown symbol for query id {:?}", query.name()))?;
    let eq = Equalities::of(rewriting);

    let mut head = Vec::with_capacity(query.head().len());
    for elem in query.head() {
        head.push(format_element(eq.find(*elem), symbols)?);
    }

    let mut body = Vec::with_capacity(rewriting.len());
    for mcd in rewriting.mcds() {
        let view = views
            .get(mcd.view().index())
            .ok_or_else(|| format!("Unknown view {:?}", mcd.view()))?;
        let view_name = symbols
            .resolve(view.name())
            .ok_or_else(|| format!("Unknown symbol for view id {:?}", view.name()))?;

        let mut args = Vec::with_capacity(view.head().len());
        for elem in view.head() {
            let shown = match *elem {
                Element::Var(v) => match mcd.binding().preimage(v) {
                    Some(query_elem) => format_element(eq.find(query_elem), symbols)?,
                    None => "_".to_string(),
                },
                Element::Const(_) => format_element(*elem, symbols)?,
            };
            args.push(shown);
        }
        body.push(format!("{}({})", view_name, args.join(", ")));
    }

    Ok(format!(
        "{}({}) :- {}",
        query_name,
        head.join(", "),
        body.join(", ")
    ))
}

#[cfg(test)]
#[path = "tests/rewrite.rs"]
mod tests;
