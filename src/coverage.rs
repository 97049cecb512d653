//! Per-subgoal coverage index.
//!
//! For each query subgoal the index lists the views that expose a predicate
//! of the same name, grouped into rank buckets ordered by descending rank.
//! Views with equal rank keep the order in which they were supplied.

use crate::record::{Query, Rank, SubgoalId, View, ViewId};
use crate::trace::debug;

/// Views sharing one rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankBucket {
    pub rank: Rank,
    pub views: Vec<ViewId>,
}

/// Coverage domain of one subgoal.
#[derive(Debug, Clone)]
pub struct SubgoalCoverage {
    buckets: Vec<RankBucket>,
    /// Flattened bucket contents, highest rank first.
    ranked: Vec<ViewId>,
}

impl SubgoalCoverage {
    pub fn buckets(&self) -> &[RankBucket] {
        &self.buckets
    }

    /// Candidate views in exploration order.
    pub fn ranked_views(&self) -> &[ViewId] {
        &self.ranked
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Coverage domains for every subgoal of one query, built once per query.
#[derive(Debug, Clone)]
pub struct CoverageIndex<'v> {
    views: &'v [View],
    entries: Vec<SubgoalCoverage>,
}

impl<'v> CoverageIndex<'v> {
    pub fn views(&self) -> &'v [View] {
        self.views
    }

    pub fn view(&self, id: ViewId) -> &'v View {
        &self.views[id.index()]
    }

    pub fn coverage(&self, subgoal: SubgoalId) -> &SubgoalCoverage {
        &self.entries[subgoal.index()]
    }

    /// Rank-ordered candidate views for `subgoal`.
    pub fn ranked_views(&self, subgoal: SubgoalId) -> &[ViewId] {
        self.coverage(subgoal).ranked_views()
    }

    /// Number of subgoals the index was built for.
    pub fn subgoal_count(&self) -> usize {
        self.entries.len()
    }

    /// Subgoals no view can cover. A query with any of these has no rewriting.
    pub fn uncovered(&self) -> impl Iterator<Item = SubgoalId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_empty())
            .map(|(i, _)| SubgoalId::new(i))
    }
}

/// Build the coverage index of `query` over `views`.
pub fn build_coverage_index<'v>(query: &Query, views: &'v [View]) -> CoverageIndex<'v> {
    let entries = query
        .subgoals()
        .iter()
        .map(|subgoal| {
            let domain = views
                .iter()
                .enumerate()
                .filter(|(_, view)| view.has_predicate_named(subgoal.name()))
                .map(|(i, _)| ViewId::new(i));
            let buckets = rank_views(domain, views);
            let ranked = buckets.iter().flat_map(|b| b.views.iter().copied()).collect();
            SubgoalCoverage { buckets, ranked }
        })
        .collect::<Vec<_>>();

    debug!(
        subgoals = entries.len(),
        views = views.len(),
        "coverage_index_built"
    );

    CoverageIndex { views, entries }
}

/// Group views by rank, highest rank first, keeping supply order inside a
/// bucket.
fn rank_views(domain: impl Iterator<Item = ViewId>, views: &[View]) -> Vec<RankBucket> {
    let mut buckets: Vec<RankBucket> = Vec::new();
    for id in domain {
        let rank = views[id.index()].rank();
        match buckets.iter_mut().find(|b| b.rank == rank) {
            Some(bucket) => bucket.views.push(id),
            None => buckets.push(RankBucket {
                rank,
                views: vec![id],
            }),
        }
    }
    buckets.sort_by(|a, b| b.rank.cmp(&a.rank));
    buckets
}

#[cfg(test)]
#[path = "tests/coverage.rs"]
mod tests;
