//! Aggregator - Per-query execution counts and latency samples
//!
//! Single sequential writer. The harness records one entry per finished
//! execution and checks the budget invariants after every step.

use crate::error::BenchError;

/// Per-query quota and the total it implies for a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBudget {
    pub per_query_quota: u32,
    pub total_budget: u64,
}

impl RunBudget {
    pub const DEFAULT_QUOTA: u32 = 10;

    pub fn new(catalog_len: usize, per_query_quota: u32) -> Self {
        Self {
            per_query_quota,
            total_budget: catalog_len as u64 * per_query_quota as u64,
        }
    }
}

/// Counts and samples for one query
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    /// Attempts that consumed quota (successful + skipped failures)
    pub completed: u32,
    pub failed: u32,
    /// Successful execution latencies in milliseconds, in execution order
    pub samples: Vec<f64>,
}

impl QueryStats {
    /// Arithmetic mean, `None` when no sample was recorded
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    /// Percentile from samples
    ///
    /// # Arguments
    /// * `p` - Percentile (0-100), e.g., 50.0 for median, 95.0 for P95
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable_by(f64::total_cmp);
        let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }
}

/// Mutable bookkeeping for one harness run
#[derive(Debug, Clone)]
pub struct ExecutionState {
    budget: RunBudget,
    stats: Vec<QueryStats>,
    remaining: u64,
}

impl ExecutionState {
    pub fn new(catalog_len: usize, budget: RunBudget) -> Self {
        Self {
            budget,
            stats: vec![QueryStats::default(); catalog_len],
            remaining: budget.total_budget,
        }
    }

    pub fn budget(&self) -> RunBudget {
        self.budget
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn stats(&self, index: usize) -> Option<&QueryStats> {
        self.stats.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryStats> {
        self.stats.iter()
    }

    pub fn completed(&self, index: usize) -> u32 {
        self.stats.get(index).map_or(0, |s| s.completed)
    }

    /// Whether the query still has quota left
    pub fn is_eligible(&self, index: usize) -> bool {
        self.completed(index) < self.budget.per_query_quota
    }

    pub fn total_completed(&self) -> u64 {
        self.stats.iter().map(|s| s.completed as u64).sum()
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Record a successful execution
    pub fn record_sample(&mut self, index: usize, elapsed_ms: f64) -> Result<u32, BenchError> {
        let stats = self.slot(index)?;
        stats.samples.push(elapsed_ms);
        stats.completed += 1;
        let n = stats.completed;
        self.remaining = self.remaining.saturating_sub(1);
        self.check_invariants()?;
        Ok(n)
    }

    /// Record a failed execution that still consumes quota (skip policy)
    pub fn record_failure(&mut self, index: usize) -> Result<u32, BenchError> {
        let stats = self.slot(index)?;
        stats.failed += 1;
        stats.completed += 1;
        let n = stats.completed;
        self.remaining = self.remaining.saturating_sub(1);
        self.check_invariants()?;
        Ok(n)
    }

    /// Budget bookkeeping must be exact: `sum(completed) + remaining == total`
    /// and no query above quota.
    pub fn check_invariants(&self) -> Result<(), BenchError> {
        let total = self.total_completed();
        if total + self.remaining != self.budget.total_budget {
            return Err(BenchError::Invariant(format!(
                "budget mismatch: completed {} + remaining {} != total {}",
                total, self.remaining, self.budget.total_budget
            )));
        }
        if let Some((index, s)) = self
            .stats
            .iter()
            .enumerate()
            .find(|(_, s)| s.completed > self.budget.per_query_quota)
        {
            return Err(BenchError::Invariant(format!(
                "query {} executed {} times, quota is {}",
                index, s.completed, self.budget.per_query_quota
            )));
        }
        Ok(())
    }

    fn slot(&mut self, index: usize) -> Result<&mut QueryStats, BenchError> {
        let quota = self.budget.per_query_quota;
        let stats = self.stats.get_mut(index).ok_or_else(|| {
            BenchError::Invariant(format!("query index {} outside catalog", index))
        })?;
        if stats.completed >= quota {
            return Err(BenchError::Invariant(format!(
                "query {} dispatched beyond quota {}",
                index, quota
            )));
        }
        Ok(stats)
    }
}
