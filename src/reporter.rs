//! Reporter - per-execution lines and the end-of-run summary
//!
//! Purely observational: sink write failures are logged and swallowed so
//! they never change scheduling or aggregation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregator::ExecutionState;
use crate::catalog::{Backend, QueryCatalog};
use crate::error::BenchError;

pub fn format_execution_line(name: &str, n: u32, elapsed_ms: f64) -> String {
    format!("{} - Execution {} completed in {:.2} ms", name, n, elapsed_ms)
}

pub fn format_failure_line(name: &str, n: u32, err: &dyn std::fmt::Display) -> String {
    format!("{} - Execution {} failed: {}", name, n, err)
}

pub fn format_summary_line(name: &str, mean_ms: f64) -> String {
    format!("{} - Average Execution Time: {:.2} ms", name, mean_ms)
}

/// Final per-query figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySummary {
    pub index: usize,
    pub name: String,
    pub completed: u32,
    pub failed: u32,
    pub mean_ms: Option<f64>,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
}

/// Harness build that produced a summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub git_hash: String,
    pub profile: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: env!("BENCH_GIT_HASH").to_string(),
            profile: env!("BENCH_BUILD_PROFILE").to_string(),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub backend: Option<Backend>,
    pub started_at: DateTime<Utc>,
    pub per_query_quota: u32,
    pub total_executions: u64,
    pub passes: u64,
    pub wall_time_ms: f64,
    pub build: BuildInfo,
    pub queries: Vec<QuerySummary>,
}

impl RunSummary {
    pub fn build(
        catalog: &QueryCatalog,
        state: &ExecutionState,
        backend: Option<Backend>,
        started_at: DateTime<Utc>,
        passes: u64,
        wall_time_ms: f64,
    ) -> Self {
        let queries = catalog
            .iter()
            .zip(state.iter())
            .enumerate()
            .map(|(index, (query, stats))| QuerySummary {
                index,
                name: query.name.clone(),
                completed: stats.completed,
                failed: stats.failed,
                mean_ms: stats.mean(),
                min_ms: stats.min(),
                max_ms: stats.max(),
                p50_ms: stats.percentile(50.0),
                p95_ms: stats.percentile(95.0),
            })
            .collect();

        Self {
            backend,
            started_at,
            per_query_quota: state.budget().per_query_quota,
            total_executions: state.total_completed(),
            passes,
            wall_time_ms,
            build: BuildInfo::current(),
            queries,
        }
    }

    pub fn query(&self, index: usize) -> Option<&QuerySummary> {
        self.queries.get(index)
    }

    /// Summary lines in catalog order; queries without samples are omitted
    pub fn summary_lines(&self) -> Vec<String> {
        self.queries
            .iter()
            .filter_map(|q| q.mean_ms.map(|mean| format_summary_line(&q.name, mean)))
            .collect()
    }

    /// Write the summary as pretty JSON into `dir`, returning the file path
    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf, BenchError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let label = self.backend.map_or("custom", |b| b.as_str());
        let path = dir.join(format!(
            "{}_{}.json",
            label,
            self.started_at.format("%Y%m%dT%H%M%SZ")
        ));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

/// Line-oriented text sink
pub struct LineReporter<W: Write> {
    sink: W,
}

impl LineReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> LineReporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn execution(&mut self, name: &str, n: u32, elapsed_ms: f64) {
        let line = format_execution_line(name, n, elapsed_ms);
        self.emit(&format!("{}\n", line));
    }

    pub fn execution_failed(&mut self, name: &str, n: u32, err: &dyn std::fmt::Display) {
        let line = format_failure_line(name, n, err);
        self.emit(&format!("{}\n", line));
    }

    /// Header plus one line per query, written as a single block
    pub fn summary(&mut self, summary: &RunSummary) {
        let mut block = String::from("\nBenchmark Results:\n");
        for line in summary.summary_lines() {
            block.push_str(&line);
            block.push('\n');
        }
        self.emit(&block);
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self
            .sink
            .write_all(text.as_bytes())
            .and_then(|_| self.sink.flush())
        {
            tracing::warn!("Report sink write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RunBudget;
    use crate::catalog::QueryDefinition;

    fn sample_summary() -> RunSummary {
        let catalog = QueryCatalog::new(vec![
            QueryDefinition::new("Q1", "SELECT 1"),
            QueryDefinition::new("Q2", "SELECT 2"),
        ]);
        let mut state = ExecutionState::new(2, RunBudget::new(2, 2));
        state.record_sample(0, 1.0).unwrap();
        state.record_sample(0, 2.0).unwrap();
        state.record_failure(1).unwrap();
        state.record_failure(1).unwrap();
        RunSummary::build(&catalog, &state, Some(Backend::Postgres), Utc::now(), 2, 3.0)
    }

    #[test]
    fn test_line_formats() {
        assert_eq!(
            format_execution_line("Query 1: x", 3, 12.3456),
            "Query 1: x - Execution 3 completed in 12.35 ms"
        );
        assert_eq!(
            format_summary_line("Query 1: x", 10.0),
            "Query 1: x - Average Execution Time: 10.00 ms"
        );
        assert_eq!(
            format_failure_line("Q", 2, &"boom"),
            "Q - Execution 2 failed: boom"
        );
    }

    #[test]
    fn test_summary_skips_queries_without_samples() {
        let summary = sample_summary();
        assert_eq!(
            summary.summary_lines(),
            vec!["Q1 - Average Execution Time: 1.50 ms".to_string()]
        );
        assert_eq!(summary.query(1).unwrap().failed, 2);
        assert_eq!(summary.total_executions, 4);
    }

    #[test]
    fn test_reporter_writes_block() {
        let mut reporter = LineReporter::new(Vec::new());
        reporter.execution("Q1", 1, 0.5);
        reporter.summary(&sample_summary());

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            out,
            "Q1 - Execution 1 completed in 0.50 ms\n\
             \nBenchmark Results:\n\
             Q1 - Average Execution Time: 1.50 ms\n"
        );
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_sink_does_not_panic() {
        let mut reporter = LineReporter::new(BrokenSink);
        reporter.execution("Q1", 1, 0.5);
        reporter.summary(&sample_summary());
    }

    #[test]
    fn test_write_json() {
        let dir = std::env::temp_dir().join(format!("sql_latency_bench_{}", std::process::id()));
        let summary = sample_summary();
        let path = summary.write_json(&dir).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["backend"], "postgres");
        assert_eq!(value["queries"][0]["mean_ms"], 1.5);
        assert!(value["queries"][1]["mean_ms"].is_null());
        assert_eq!(value["build"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(!value["build"]["git_hash"].as_str().unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
