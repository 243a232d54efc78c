//! SQL Latency Bench - entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────────┐    ┌──────────┐
//! │  Config  │───▶│ Session  │───▶│    Harness    │───▶│  stdout  │
//! │  (YAML)  │    │ (1 conn) │    │ (quota/pass)  │    │ + JSON   │
//! └──────────┘    └──────────┘    └───────────────┘    └──────────┘
//! ```
//!
//! Usage: `sql_latency_bench [--env dev] [--backend postgres|mysql|all]
//!         [--quota N] [--seed N] [--skip-failures] [--concurrent]`

use anyhow::{Context, Result};
use std::sync::Arc;

use sql_latency_bench::catalog::Backend;
use sql_latency_bench::config::AppConfig;
use sql_latency_bench::harness::ErrorPolicy;
use sql_latency_bench::reporter::RunSummary;
use sql_latency_bench::runner::run_backend;

fn arg_value(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if names.contains(&args[i].as_str()) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

fn get_env() -> String {
    arg_value(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

fn get_backends() -> Result<Vec<Backend>> {
    match arg_value(&["--backend", "-b"]).as_deref() {
        None | Some("all") => Ok(Backend::ALL.to_vec()),
        Some(name) => Ok(vec![name.parse::<Backend>()?]),
    }
}

fn apply_cli_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(quota) = arg_value(&["--quota"]) {
        config.benchmark.per_query_quota = quota
            .parse()
            .with_context(|| format!("invalid --quota: {}", quota))?;
    }
    if let Some(seed) = arg_value(&["--seed"]) {
        config.benchmark.seed = Some(
            seed.parse()
                .with_context(|| format!("invalid --seed: {}", seed))?,
        );
    }
    if has_flag("--skip-failures") {
        config.benchmark.on_error = ErrorPolicy::Skip;
    }
    Ok(())
}

async fn bench(config: &AppConfig, backend: Backend) -> Result<RunSummary> {
    run_backend(config, backend)
        .await
        .with_context(|| format!("{} benchmark failed", backend))
}

/// Concurrent only when asked and there is more than one backend
fn runs_concurrently(concurrent_flag: bool, backends: &[Backend]) -> bool {
    concurrent_flag && backends.len() > 1
}

/// Each backend in its own spawned task, so one harness's stdout writes
/// never run on the task that is timing the other harness.
async fn bench_concurrently(config: AppConfig, backends: &[Backend]) -> Vec<Result<RunSummary>> {
    let config = Arc::new(config);
    let handles: Vec<_> = backends
        .iter()
        .map(|&backend| {
            let config = Arc::clone(&config);
            (
                backend,
                tokio::spawn(async move { bench(&config, backend).await }),
            )
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (backend, handle) in handles {
        results.push(
            handle
                .await
                .with_context(|| format!("{} benchmark task panicked", backend))
                .and_then(|r| r),
        );
    }
    results
}

/// Log every failed backend; error out if any failed
fn check_results(results: Vec<Result<RunSummary>>) -> Result<usize> {
    let mut failed = 0;
    let mut completed = 0;
    for result in results {
        match result {
            Ok(_) => completed += 1,
            Err(e) => {
                tracing::error!("{:#}", e);
                eprintln!("Error during benchmarking: {:#}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} backend(s) failed", failed);
    }
    Ok(completed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env)?;
    apply_cli_overrides(&mut config)?;
    let backends = get_backends()?;
    let concurrent = has_flag("--concurrent");

    // Dropped on every return path so the file writer flushes
    let _log_guard = sql_latency_bench::logging::init_logging(&config);
    tracing::info!(
        "Starting sql_latency_bench {} ({}, {} build) in {} mode",
        env!("CARGO_PKG_VERSION"),
        env!("BENCH_GIT_HASH"),
        env!("BENCH_BUILD_PROFILE"),
        env
    );

    // Sequential by default: one backend's output never lands inside the
    // other's timed window.
    let results = if runs_concurrently(concurrent, &backends) {
        bench_concurrently(config, &backends).await
    } else {
        let mut results = Vec::with_capacity(backends.len());
        for &backend in &backends {
            results.push(bench(&config, backend).await);
        }
        results
    };

    let completed = check_results(results)?;
    tracing::info!("{} backend(s) benchmarked", completed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary() -> RunSummary {
        RunSummary {
            backend: Some(Backend::Postgres),
            started_at: Utc::now(),
            per_query_quota: 1,
            total_executions: 0,
            passes: 0,
            wall_time_ms: 0.0,
            build: Default::default(),
            queries: Vec::new(),
        }
    }

    #[test]
    fn test_backends_run_sequentially_by_default() {
        assert!(!runs_concurrently(false, &Backend::ALL));
        assert!(!runs_concurrently(true, &[Backend::Mysql]));
        assert!(runs_concurrently(true, &Backend::ALL));
    }

    #[test]
    fn test_check_results_all_ok() {
        assert_eq!(check_results(vec![Ok(summary()), Ok(summary())]).unwrap(), 2);
    }

    #[test]
    fn test_check_results_returns_error_instead_of_exiting() {
        let results = vec![
            Ok(summary()),
            Err::<RunSummary, _>(anyhow::anyhow!("connection refused")).context("mysql benchmark failed"),
        ];
        let err = check_results(results).unwrap_err();
        assert_eq!(err.to_string(), "1 backend(s) failed");
    }
}
