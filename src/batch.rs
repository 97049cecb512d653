//! Rewriting many independent queries in parallel.
//!
//! Each job gets its own coverage index and MCD cache; nothing is shared
//! between jobs except the read-only inputs. Workers pull job indices from a
//! channel and send results back tagged with the index, so the output is in
//! job order whatever order the workers finish in.

use crossbeam_channel::unbounded;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::coverage::build_coverage_index;
use crate::record::{Query, View};
use crate::rewrite::{Enumeration, Enumerator};
use crate::trace::{debug, debug_span};

/// One query with the views it may be rewritten over.
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    pub query: &'a Query,
    pub views: &'a [View],
}

impl<'a> Job<'a> {
    pub fn new(query: &'a Query, views: &'a [View]) -> Self {
        Self { query, views }
    }

    fn run(&self, cap: usize) -> Enumeration<'a> {
        let index = build_coverage_index(self.query, self.views);
        Enumerator::new(self.query, &index).run(cap)
    }
}

/// Number of CPUs (fallback to 1).
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Rewrite every job with at most `cap` rewritings each, on up to `workers`
/// threads. Results are in job order.
pub fn rewrite_batch<'a>(jobs: &[Job<'a>], cap: usize, workers: usize) -> Vec<Enumeration<'a>> {
    let workers = workers.clamp(1, jobs.len().max(1));
    let _span = debug_span!("rewrite_batch", jobs = jobs.len(), workers).entered();

    if workers == 1 {
        return jobs.iter().map(|job| job.run(cap)).collect();
    }

    let (job_tx, job_rx) = unbounded::<usize>();
    let (result_tx, result_rx) = unbounded::<(usize, Enumeration<'a>)>();
    for i in 0..jobs.len() {
        // The receiver is alive until the scope below ends.
        let _ = job_tx.send(i);
    }
    drop(job_tx);

    let completed = AtomicUsize::new(0);
    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let completed = &completed;
            scope.spawn(move || {
                while let Ok(i) = job_rx.recv() {
                    let run = jobs[i].run(cap);
                    completed.fetch_add(1, Ordering::Relaxed);
                    if result_tx.send((i, run)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<Enumeration<'a>>> = (0..jobs.len()).map(|_| None).collect();
    for (i, run) in result_rx.try_iter() {
        slots[i] = Some(run);
    }
    debug!(
        completed = completed.load(Ordering::Relaxed),
        "batch_finished"
    );
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
#[path = "tests/batch.rs"]
mod tests;
