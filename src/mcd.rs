//! MiniCon descriptions (MCDs).
//!
//! An MCD records that a view can cover one or more query subgoals through a
//! single binding. Formation aligns a subgoal with every compatible predicate
//! of the view, then keeps only alignments that satisfy the MCD property:
//!
//! 1. every query variable in the covered subgoals maps to one view element;
//! 2. query head variables map to view head variables;
//! 3. query constants aligned with view variables need those variables in
//!    the view head;
//! 4. a query variable mapped to a view variable the view does not export
//!    drags every query subgoal mentioning it into the same MCD. Formation
//!    extends the coverage with those subgoals, branching over each
//!    compatible view predicate.

use crate::binding::Binding;
use crate::predicate::Element;
use crate::record::{Query, SubgoalId, View, ViewId};
use crate::symbol::VarId;
use crate::trace::trace;
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

type FxMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A validated cover of query subgoals by one view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mcd {
    view: ViewId,
    binding: Binding,
    /// Covered subgoals, ascending.
    covered: SmallVec<[SubgoalId; 4]>,
    /// (subgoal, index of the view predicate it maps to) in formation order.
    targets: SmallVec<[(SubgoalId, usize); 4]>,
}

impl Mcd {
    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Covered subgoals in ascending order.
    pub fn covered(&self) -> &[SubgoalId] {
        &self.covered
    }

    /// Which view predicate each covered subgoal was mapped onto.
    pub fn targets(&self) -> &[(SubgoalId, usize)] {
        &self.targets
    }

    pub fn covers(&self, subgoal: SubgoalId) -> bool {
        self.covered.binary_search(&subgoal).is_ok()
    }

    pub fn number_of_subgoals(&self) -> usize {
        self.covered.len()
    }

    /// Two MCDs are disjoint iff they cover no common subgoal.
    pub fn is_disjoint(&self, other: &Mcd) -> bool {
        !self.covered.iter().any(|s| other.covers(*s))
    }

    /// Identity used when deduplicating rewritings: the view, what it covers
    /// and how, ignoring which of several identical view atoms was used.
    pub fn same_cover(&self, other: &Mcd) -> bool {
        self.view == other.view && self.covered == other.covered && self.binding == other.binding
    }
}

/// What a closure still needs before it is a valid MCD.
enum Requirement {
    Complete,
    Cover(SubgoalId),
    Violated,
}

/// A partially built MCD.
#[derive(Clone, Default)]
struct Closure {
    assignment: SmallVec<[(VarId, Element); 8]>,
    targets: SmallVec<[(SubgoalId, usize); 4]>,
}

impl Closure {
    fn covers(&self, subgoal: SubgoalId) -> bool {
        self.targets.iter().any(|(s, _)| *s == subgoal)
    }

    fn assigned(&self, var: VarId) -> Option<Element> {
        self.assignment
            .iter()
            .find(|(v, _)| *v == var)
            .map(|(_, e)| *e)
    }

    /// Map `subgoal` onto view predicate `target`, keeping the assignment
    /// single-valued. Returns false if the alignment contradicts it.
    fn absorb(&mut self, query: &Query, view: &View, subgoal: SubgoalId, target: usize) -> bool {
        let query_pred = query.subgoal(subgoal);
        let view_pred = &view.subgoals()[target];
        for (&q, &v) in query_pred.elements().iter().zip(view_pred.elements()) {
            match q {
                Element::Var(x) => match self.assigned(x) {
                    Some(prev) if prev != v => return false,
                    Some(_) => {}
                    None => self.assignment.push((x, v)),
                },
                Element::Const(_) => {
                    if let Element::Var(w) = v {
                        if !view.exports(w) {
                            return false;
                        }
                    }
                }
            }
        }
        self.targets.push((subgoal, target));
        true
    }

    /// Check head-variable preservation and find the next subgoal that the
    /// existential closure still requires.
    fn requirement(&self, query: &Query, view: &View) -> Requirement {
        for &(x, v) in &self.assignment {
            let existential = match v {
                Element::Var(w) => !view.exports(w),
                Element::Const(_) => false,
            };
            if query.exports(x) && (v.is_const() || existential) {
                return Requirement::Violated;
            }
            if existential {
                if let Some(missing) = query.subgoals_mentioning(x).find(|s| !self.covers(*s)) {
                    return Requirement::Cover(missing);
                }
            }
        }
        Requirement::Complete
    }

    fn into_mcd(self, query: &Query, view_id: ViewId, view: &View) -> Mcd {
        let binding = Binding::align(
            self.targets
                .iter()
                .map(|&(s, t)| (query.subgoal(s), &view.subgoals()[t])),
        );
        let mut covered: SmallVec<[SubgoalId; 4]> = self.targets.iter().map(|(s, _)| *s).collect();
        covered.sort_unstable();
        Mcd {
            view: view_id,
            binding,
            covered,
            targets: self.targets,
        }
    }
}

/// Outcome counters for one formation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormationStats {
    /// Subgoal/view-predicate pairs that passed `can_be_mapped`.
    pub candidates: u64,
    /// Closures discarded for violating the MCD property.
    pub rejected: u64,
}

/// All MCDs that cover `subgoal` using `view`, in view predicate order.
pub fn form_mcds(
    query: &Query,
    subgoal: SubgoalId,
    view_id: ViewId,
    view: &View,
) -> (Vec<Mcd>, FormationStats) {
    let mut stats = FormationStats::default();
    let mut closures: Vec<Closure> = Vec::new();
    let goal = query.subgoal(subgoal);

    for (target, view_pred) in view.subgoals().iter().enumerate() {
        if !goal.can_be_mapped(view_pred) {
            continue;
        }
        stats.candidates += 1;
        let mut closure = Closure::default();
        if closure.absorb(query, view, subgoal, target) {
            extend(query, view, closure, &mut closures, &mut stats);
        } else {
            stats.rejected += 1;
            trace!(
                subgoal = subgoal.index(),
                view_atom = target,
                "mcd_inconsistent_alignment"
            );
        }
    }

    let mut mcds: Vec<Mcd> = Vec::with_capacity(closures.len());
    for closure in closures {
        let mcd = closure.into_mcd(query, view_id, view);
        if !mcds.contains(&mcd) {
            mcds.push(mcd);
        }
    }
    (mcds, stats)
}

fn extend(
    query: &Query,
    view: &View,
    closure: Closure,
    out: &mut Vec<Closure>,
    stats: &mut FormationStats,
) {
    let missing = match closure.requirement(query, view) {
        Requirement::Complete => {
            out.push(closure);
            return;
        }
        Requirement::Cover(missing) => missing,
        Requirement::Violated => {
            stats.rejected += 1;
            trace!("mcd_head_variable_not_preserved");
            return;
        }
    };

    let goal = query.subgoal(missing);
    let mut extended = false;
    for (target, view_pred) in view.subgoals().iter().enumerate() {
        if !goal.can_be_mapped(view_pred) {
            continue;
        }
        let mut next = closure.clone();
        if next.absorb(query, view, missing, target) {
            extended = true;
            extend(query, view, next, out, stats);
        }
    }
    if !extended {
        stats.rejected += 1;
        trace!(subgoal = missing.index(), "mcd_closure_unsatisfiable");
    }
}

/// Query-scoped memo table of MCDs keyed by (subgoal, view).
///
/// Each key is computed at most once; later lookups share the stored list.
/// A cache belongs to one query and must not be reused for another.
pub struct McdCache<'q> {
    query: &'q Query,
    views: &'q [View],
    entries: FxMap<(SubgoalId, ViewId), Arc<[Arc<Mcd>]>>,
    computations: u64,
    hits: u64,
    formation: FormationStats,
}

impl<'q> McdCache<'q> {
    pub fn new(query: &'q Query, views: &'q [View]) -> Self {
        Self {
            query,
            views,
            entries: FxMap::default(),
            computations: 0,
            hits: 0,
            formation: FormationStats::default(),
        }
    }

    /// MCDs covering `subgoal` with `view`, computing them on first request.
    pub fn mcds_for(&mut self, subgoal: SubgoalId, view: ViewId) -> Arc<[Arc<Mcd>]> {
        if let Some(found) = self.entries.get(&(subgoal, view)) {
            self.hits += 1;
            return Arc::clone(found);
        }

        let (mcds, stats) = form_mcds(self.query, subgoal, view, &self.views[view.index()]);
        self.computations += 1;
        self.formation.candidates += stats.candidates;
        self.formation.rejected += stats.rejected;

        let shared: Arc<[Arc<Mcd>]> = mcds.into_iter().map(Arc::new).collect();
        self.entries.insert((subgoal, view), Arc::clone(&shared));
        shared
    }

    pub fn is_cached(&self, subgoal: SubgoalId, view: ViewId) -> bool {
        self.entries.contains_key(&(subgoal, view))
    }

    /// Number of (subgoal, view) pairs actually formed.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Number of lookups served from the table.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn formation_stats(&self) -> FormationStats {
        self.formation
    }
}

#[cfg(test)]
#[path = "tests/mcd.rs"]
mod tests;
