//! Search metrics for one rewriting enumeration.
//!
//! The enumerator is single-threaded, so counters are plain integers updated
//! through `&mut self`. A `MetricsReport` snapshot is returned with the
//! rewritings.

/// Counters collected while enumerating rewritings.
#[derive(Debug, Clone, Default)]
pub struct SearchMetrics {
    branches: u64,
    leaves: u64,
    rejected_leaves: u64,
    emitted: u64,
    max_depth: u64,
    cap_reached: bool,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into a search node at `depth` MCDs deep.
    #[inline]
    pub fn record_branch(&mut self, depth: usize) {
        self.branches += 1;
        self.max_depth = self.max_depth.max(depth as u64);
    }

    /// Record a complete candidate and whether it passed validation.
    #[inline]
    pub fn record_leaf(&mut self, valid: bool) {
        self.leaves += 1;
        if valid {
            self.emitted += 1;
        } else {
            self.rejected_leaves += 1;
        }
    }

    #[inline]
    pub fn record_cap_reached(&mut self) {
        self.cap_reached = true;
    }

    pub fn branches(&self) -> u64 {
        self.branches
    }

    /// Snapshot the counters, folding in MCD cache statistics.
    pub fn report(&self, mcd_computations: u64, mcd_cache_hits: u64, mcds_rejected: u64) -> MetricsReport {
        MetricsReport {
            branches: self.branches,
            leaves: self.leaves,
            rejected_leaves: self.rejected_leaves,
            emitted: self.emitted,
            max_depth: self.max_depth,
            cap_reached: self.cap_reached,
            mcd_computations,
            mcd_cache_hits,
            mcds_rejected,
        }
    }
}

/// Snapshot of metrics at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    /// Search nodes entered, including the root.
    pub branches: u64,
    /// Nodes where every subgoal was covered.
    pub leaves: u64,
    /// Complete candidates that failed the rewriting check.
    pub rejected_leaves: u64,
    /// Rewritings handed back to the caller.
    pub emitted: u64,
    /// Deepest prefix explored, in MCDs.
    pub max_depth: u64,
    /// Whether the requested count cut the search short.
    pub cap_reached: bool,
    /// (subgoal, view) pairs for which MCDs were formed.
    pub mcd_computations: u64,
    /// MCD lookups answered from the cache.
    pub mcd_cache_hits: u64,
    /// MCD candidates discarded during formation.
    pub mcds_rejected: u64,
}

impl MetricsReport {
    /// Fraction of complete candidates that became rewritings.
    pub fn leaf_success_rate(&self) -> f64 {
        if self.leaves == 0 {
            1.0
        } else {
            self.emitted as f64 / self.leaves as f64
        }
    }

    /// Fraction of MCD lookups served from the cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.mcd_computations + self.mcd_cache_hits;
        if total == 0 {
            0.0
        } else {
            self.mcd_cache_hits as f64 / total as f64
        }
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Search Metrics ===")?;
        writeln!(f, "Branches:           {} (max depth {})", self.branches, self.max_depth)?;
        writeln!(
            f,
            "Leaves:             {} ({} rejected, {:.1}% valid)",
            self.leaves,
            self.rejected_leaves,
            self.leaf_success_rate() * 100.0
        )?;
        writeln!(
            f,
            "MCD formation:      {} computed, {} cache hits ({:.1}%), {} rejected",
            self.mcd_computations,
            self.mcd_cache_hits,
            self.cache_hit_rate() * 100.0,
            self.mcds_rejected
        )?;
        writeln!(f, "Rewritings:         {}", self.emitted)?;
        if self.cap_reached {
            writeln!(f, "Stopped at requested count")?;
        }
        Ok(())
    }
}
