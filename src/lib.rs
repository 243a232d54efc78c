//! SQL Latency Bench - randomized analytical query benchmark
//!
//! Times a fixed catalog of analytical queries against PostgreSQL and MySQL,
//! one sequential execution at a time over a single connection per backend.
//!
//! # Modules
//!
//! - [`catalog`] - Named query definitions, built-in per backend
//! - [`scheduler`] - Pass-based randomized scheduling with per-query quota
//! - [`timer`] - Monotonic clock and single-execution timing
//! - [`aggregator`] - Execution counts, latency samples, budget invariants
//! - [`reporter`] - Execution/summary lines and JSON run summaries
//! - [`harness`] - Run driver and state machine
//! - [`executor`] - Database seam (`QueryExecutor`)
//! - [`db`] - Connection setup and teardown
//! - [`runner`] - Connect, run, close for one backend

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod harness;
pub mod logging;
pub mod reporter;
pub mod runner;
pub mod scheduler;
pub mod timer;

// Convenient re-exports at crate root
pub use aggregator::{ExecutionState, QueryStats, RunBudget};
pub use catalog::{Backend, QueryCatalog, QueryDefinition};
pub use error::BenchError;
pub use executor::QueryExecutor;
pub use harness::{BenchmarkHarness, ErrorPolicy, RunPhase, RunSettings};
pub use reporter::{BuildInfo, LineReporter, QuerySummary, RunSummary};
pub use scheduler::Scheduler;
pub use timer::{Clock, MonotonicClock, SteppingClock};
