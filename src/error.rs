//! Benchmark Error Types

use thiserror::Error;

use crate::harness::RunPhase;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database handle could not be acquired or was lost mid-run.
    /// `index`/`name` are set when the loss surfaced during a query.
    #[error(
        "Connection failed{} after {completed} completed executions",
        during_query(.index, .name)
    )]
    Connection {
        index: Option<usize>,
        name: Option<String>,
        completed: u64,
        #[source]
        source: sqlx::Error,
    },

    /// A single query execution failed under the fatal policy.
    #[error(
        "Query {index} ({name}) failed after {completed} completed executions"
    )]
    Execution {
        index: usize,
        name: String,
        completed: u64,
        #[source]
        source: sqlx::Error,
    },

    /// Scheduler or aggregator bookkeeping is inconsistent. Never corrected.
    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Run cannot start from phase {0:?}")]
    InvalidPhase(RunPhase),

    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl BenchError {
    /// Failing query index, if the error is tied to one
    pub fn query_index(&self) -> Option<usize> {
        match self {
            BenchError::Execution { index, .. } => Some(*index),
            BenchError::Connection { index, .. } => *index,
            _ => None,
        }
    }

    /// Executions recorded before the run aborted
    pub fn completed_before_failure(&self) -> Option<u64> {
        match self {
            BenchError::Connection { completed, .. } | BenchError::Execution { completed, .. } => {
                Some(*completed)
            }
            _ => None,
        }
    }
}

fn during_query(index: &Option<usize>, name: &Option<String>) -> String {
    match (index, name) {
        (Some(i), Some(n)) => format!(" during query {} ({})", i, n),
        (Some(i), None) => format!(" during query {}", i),
        _ => String::new(),
    }
}

/// Whether a sqlx error means the connection itself is unusable.
///
/// These abort the run even under the skip policy.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
