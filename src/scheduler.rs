//! Execution Scheduler
//!
//! Pass-based randomized scheduling. Each pass is a fresh uniform permutation
//! of all catalog indices; indices that already reached quota are skipped
//! when their turn comes. This interleaves repetitions instead of running one
//! query back to back, so cache warm-up does not favor any single query.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::aggregator::ExecutionState;

pub struct Scheduler {
    rng: StdRng,
    catalog_len: usize,
    /// Remaining indices of the current pass, consumed from the back
    pass: Vec<usize>,
    passes: u64,
}

impl Scheduler {
    /// Scheduler with an optional fixed seed; `None` seeds from OS entropy
    pub fn new(catalog_len: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(catalog_len, rng)
    }

    pub fn with_rng(catalog_len: usize, rng: StdRng) -> Self {
        Self {
            rng,
            catalog_len,
            pass: Vec::with_capacity(catalog_len),
            passes: 0,
        }
    }

    /// Number of passes started so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Next index to execute, or `None` once every query reached quota.
    ///
    /// The caller must record the execution in `state` before asking again.
    pub fn next_index(&mut self, state: &ExecutionState) -> Option<usize> {
        if state.is_complete() || self.catalog_len == 0 {
            return None;
        }
        loop {
            while let Some(index) = self.pass.pop() {
                if state.is_eligible(index) {
                    return Some(index);
                }
            }
            // A fresh pass always contains every index still under quota,
            // so this terminates unless the state disagrees with its budget.
            if !self.start_pass(state) {
                return None;
            }
        }
    }

    fn start_pass(&mut self, state: &ExecutionState) -> bool {
        if !(0..self.catalog_len).any(|i| state.is_eligible(i)) {
            return false;
        }
        self.pass.clear();
        self.pass.extend(0..self.catalog_len);
        self.pass.shuffle(&mut self.rng);
        self.passes += 1;
        tracing::trace!(pass = self.passes, order = ?self.pass, "new pass");
        true
    }
}
