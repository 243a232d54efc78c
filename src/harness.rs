//! Benchmark Harness - drives one sequential, single-connection run
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌─────────┐    ┌────────────┐    ┌──────────┐
//! │ Catalog  │───▶│ Scheduler │───▶│  Timer  │───▶│ Aggregator │───▶│ Reporter │
//! │ (fixed)  │    │ (passes)  │    │ (exec)  │    │ (samples)  │    │ (lines)  │
//! └──────────┘    └───────────┘    └─────────┘    └────────────┘    └──────────┘
//! ```
//!
//! Exactly one execution is in flight. The next index is not scheduled until
//! the previous measurement has been recorded.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Instant;

use crate::aggregator::{ExecutionState, RunBudget};
use crate::catalog::{Backend, QueryCatalog};
use crate::error::{BenchError, is_connection_error};
use crate::executor::QueryExecutor;
use crate::reporter::{LineReporter, RunSummary};
use crate::scheduler::Scheduler;
use crate::timer::{Clock, MonotonicClock, duration_to_ms, time_execution};

/// What to do when a single execution fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the run on the first failed execution
    #[default]
    Fatal,
    /// Count the attempt against quota, record no sample, keep going
    Skip,
}

/// Run-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub per_query_quota: u32,
    pub on_error: ErrorPolicy,
    pub seed: Option<u64>,
    pub backend: Option<Backend>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            per_query_quota: RunBudget::DEFAULT_QUOTA,
            on_error: ErrorPolicy::Fatal,
            seed: None,
            backend: None,
        }
    }
}

pub struct BenchmarkHarness<'a, E: ?Sized, C = MonotonicClock, W: Write = std::io::Stdout> {
    catalog: &'a QueryCatalog,
    executor: &'a mut E,
    clock: C,
    reporter: LineReporter<W>,
    settings: RunSettings,
    scheduler: Scheduler,
    state: ExecutionState,
    phase: RunPhase,
}

impl<'a, E> BenchmarkHarness<'a, E>
where
    E: QueryExecutor + ?Sized,
{
    /// Harness on the production clock, reporting to stdout
    pub fn new(catalog: &'a QueryCatalog, executor: &'a mut E, settings: RunSettings) -> Self {
        Self::with_parts(
            catalog,
            executor,
            MonotonicClock::new(),
            LineReporter::stdout(),
            settings,
        )
    }
}

impl<'a, E, C, W> BenchmarkHarness<'a, E, C, W>
where
    E: QueryExecutor + ?Sized,
    C: Clock,
    W: Write,
{
    pub fn with_parts(
        catalog: &'a QueryCatalog,
        executor: &'a mut E,
        clock: C,
        reporter: LineReporter<W>,
        settings: RunSettings,
    ) -> Self {
        let budget = RunBudget::new(catalog.len(), settings.per_query_quota);
        Self {
            catalog,
            executor,
            clock,
            reporter,
            scheduler: Scheduler::new(catalog.len(), settings.seed),
            state: ExecutionState::new(catalog.len(), budget),
            settings,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Live bookkeeping; after a failed run it holds the partial aggregates
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn into_reporter(self) -> LineReporter<W> {
        self.reporter
    }

    /// Execute the whole schedule. A harness runs at most once.
    pub async fn run(&mut self) -> Result<RunSummary, BenchError> {
        if self.phase != RunPhase::Idle {
            return Err(BenchError::InvalidPhase(self.phase));
        }
        self.phase = RunPhase::Running;

        let label = self.label();
        let budget = self.state.budget();
        tracing::info!(
            backend = %label,
            queries = self.catalog.len(),
            quota = budget.per_query_quota,
            total = budget.total_budget,
            policy = ?self.settings.on_error,
            "Benchmark run started"
        );

        let started_at = Utc::now();
        let wall = Instant::now();

        match self.drive(&label).await {
            Ok(()) => {
                self.phase = RunPhase::Completed;
                let summary = RunSummary::build(
                    self.catalog,
                    &self.state,
                    self.settings.backend,
                    started_at,
                    self.scheduler.passes(),
                    duration_to_ms(wall.elapsed()),
                );
                self.reporter.summary(&summary);
                tracing::info!(
                    backend = %label,
                    executions = summary.total_executions,
                    passes = summary.passes,
                    wall_ms = summary.wall_time_ms,
                    "Benchmark run completed"
                );
                Ok(summary)
            }
            Err(e) => {
                self.phase = RunPhase::Failed;
                tracing::error!(
                    backend = %label,
                    completed = self.state.total_completed(),
                    "Benchmark run aborted: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn drive(&mut self, label: &str) -> Result<(), BenchError> {
        let catalog = self.catalog;
        while let Some(index) = self.scheduler.next_index(&self.state) {
            let query = catalog.get(index).ok_or_else(|| {
                BenchError::Invariant(format!("scheduled index {} outside catalog", index))
            })?;

            match time_execution(&self.clock, &mut *self.executor, &query.text).await {
                Ok(m) => {
                    let n = self.state.record_sample(index, m.elapsed_ms)?;
                    tracing::debug!(
                        backend = %label,
                        query = %query.name,
                        index,
                        n,
                        elapsed_ms = m.elapsed_ms,
                        rows = m.rows,
                        "execution"
                    );
                    self.reporter.execution(&query.name, n, m.elapsed_ms);
                }
                Err(e) if is_connection_error(&e) => {
                    return Err(BenchError::Connection {
                        index: Some(index),
                        name: Some(query.name.clone()),
                        completed: self.state.total_completed(),
                        source: e,
                    });
                }
                Err(e) => match self.settings.on_error {
                    ErrorPolicy::Fatal => {
                        return Err(BenchError::Execution {
                            index,
                            name: query.name.clone(),
                            completed: self.state.total_completed(),
                            source: e,
                        });
                    }
                    ErrorPolicy::Skip => {
                        let n = self.state.record_failure(index)?;
                        tracing::warn!(
                            backend = %label,
                            query = %query.name,
                            index,
                            n,
                            "execution failed, skipping: {}",
                            e
                        );
                        self.reporter.execution_failed(&query.name, n, &e);
                    }
                },
            }
        }

        if !self.state.is_complete() {
            return Err(BenchError::Invariant(format!(
                "scheduler stopped with {} executions remaining",
                self.state.remaining()
            )));
        }
        self.state.check_invariants()
    }

    fn label(&self) -> String {
        self.settings
            .backend
            .map_or_else(|| "custom".to_string(), |b| b.to_string())
    }
}
