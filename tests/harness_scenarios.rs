use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sql_latency_bench::{
    BenchError, BenchmarkHarness, ErrorPolicy, LineReporter, QueryCatalog, QueryDefinition,
    QueryExecutor, RunPhase, RunSettings, SteppingClock,
};

/// Executor that succeeds unless told to fail a given invocation of a query
#[derive(Default)]
struct ScriptedExecutor {
    calls: Vec<String>,
    fail_at: HashMap<String, usize>,
}

impl ScriptedExecutor {
    fn failing(sql: &str, nth: usize) -> Self {
        let mut exec = Self::default();
        exec.fail_at.insert(sql.to_string(), nth);
        exec
    }

    fn count(&self, sql: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == sql).count()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute_query(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        self.calls.push(sql.to_string());
        if self.fail_at.get(sql) == Some(&self.count(sql)) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint ({})",
                sql
            )));
        }
        Ok(0)
    }
}

fn catalog(n: usize) -> QueryCatalog {
    QueryCatalog::new(
        (0..n)
            .map(|i| {
                QueryDefinition::new(format!("Query {}", i + 1), format!("SELECT {} AS q", i))
            })
            .collect(),
    )
}

fn settings(quota: u32) -> RunSettings {
    RunSettings {
        per_query_quota: quota,
        on_error: ErrorPolicy::Fatal,
        seed: Some(2024),
        backend: None,
    }
}

fn output(reporter: LineReporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[tokio::test]
async fn two_queries_quota_three_fill_budget_of_six() {
    let catalog = catalog(2);
    let mut exec = ScriptedExecutor::default();
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        settings(3),
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(summary.total_executions, 6);

    let state = harness.state();
    assert_eq!(state.budget().total_budget, 6);
    assert_eq!(state.completed(0), 3);
    assert_eq!(state.completed(1), 3);
    assert_eq!(state.stats(0).unwrap().samples.len(), 3);
    assert_eq!(state.stats(1).unwrap().samples.len(), 3);
    assert_eq!(state.remaining(), 0);

    drop(harness);
    assert_eq!(exec.count("SELECT 0 AS q"), 3);
    assert_eq!(exec.count("SELECT 1 AS q"), 3);
}

#[tokio::test]
async fn constant_ten_ms_query_reports_ten_ms_mean() {
    let catalog = catalog(1);
    let mut exec = ScriptedExecutor::default();
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(10)),
        LineReporter::new(Vec::new()),
        settings(5),
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(summary.query(0).unwrap().mean_ms, Some(10.0));

    let out = output(harness.into_reporter());
    let lines: Vec<&str> = out.lines().collect();
    for (i, line) in lines[..5].iter().enumerate() {
        assert_eq!(
            *line,
            format!("Query 1 - Execution {} completed in 10.00 ms", i + 1)
        );
    }
    assert_eq!(lines.last().copied(), Some("Query 1 - Average Execution Time: 10.00 ms"));
}

#[tokio::test]
async fn second_invocation_failure_aborts_and_names_query() {
    let catalog = catalog(2);
    let mut exec = ScriptedExecutor::failing("SELECT 1 AS q", 2);
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        settings(3),
    );

    let err = harness.run().await.unwrap_err();
    assert_eq!(harness.phase(), RunPhase::Failed);

    match &err {
        BenchError::Execution {
            index,
            name,
            completed,
            ..
        } => {
            assert_eq!(*index, 1);
            assert_eq!(name, "Query 2");
            assert_eq!(*completed, harness.state().total_completed());
        }
        other => panic!("expected execution error, got {:?}", other),
    }
    assert_eq!(harness.state().completed(1), 1);
    assert!(harness.state().completed(0) <= 3);

    let out = output(harness.into_reporter());
    assert!(!out.contains("Benchmark Results"));
    assert!(!out.contains("Average Execution Time"));
}

#[tokio::test]
async fn skip_policy_finishes_and_omits_sampleless_query() {
    let catalog = catalog(2);
    let mut exec = ScriptedExecutor::failing("SELECT 1 AS q", 1);
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        RunSettings {
            on_error: ErrorPolicy::Skip,
            ..settings(1)
        },
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(harness.phase(), RunPhase::Completed);
    assert_eq!(summary.query(1).unwrap().failed, 1);
    assert_eq!(summary.query(1).unwrap().mean_ms, None);

    let out = output(harness.into_reporter());
    assert!(out.contains("Query 1 - Average Execution Time: 1.00 ms"));
    assert!(!out.contains("Query 2 - Average Execution Time"));
}

#[tokio::test]
async fn empty_catalog_completes_immediately() {
    let catalog = QueryCatalog::default();
    let mut exec = ScriptedExecutor::default();
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        settings(10),
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(harness.phase(), RunPhase::Completed);
    assert_eq!(summary.total_executions, 0);
    assert!(summary.queries.is_empty());
    assert!(summary.summary_lines().is_empty());

    drop(harness);
    assert!(exec.calls.is_empty());
}

#[tokio::test]
async fn zero_quota_executes_nothing() {
    let catalog = catalog(3);
    let mut exec = ScriptedExecutor::default();
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        settings(0),
    );

    let summary = harness.run().await.unwrap();
    assert_eq!(summary.total_executions, 0);
    assert!(summary.queries.iter().all(|q| q.mean_ms.is_none()));
}

#[tokio::test]
async fn execution_lines_never_let_counts_drift_more_than_one_pass() {
    let n = 4;
    let catalog = catalog(n);
    let mut exec = ScriptedExecutor::default();
    let mut harness = BenchmarkHarness::with_parts(
        &catalog,
        &mut exec,
        SteppingClock::new(Duration::from_millis(1)),
        LineReporter::new(Vec::new()),
        settings(6),
    );
    harness.run().await.unwrap();
    drop(harness);

    let mut counts = vec![0u32; n];
    for sql in &exec.calls {
        let index: usize = sql
            .trim_start_matches("SELECT ")
            .trim_end_matches(" AS q")
            .parse()
            .unwrap();
        counts[index] += 1;
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1, "drift at {:?}", counts);
        assert!(max <= 6);
    }
    assert_eq!(counts, vec![6; n]);
}
