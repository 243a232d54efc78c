//! Backend runner - connect, benchmark, always close

use crate::catalog::{Backend, QueryCatalog};
use crate::config::AppConfig;
use crate::db::Session;
use crate::error::BenchError;
use crate::harness::{BenchmarkHarness, RunSettings};
use crate::reporter::RunSummary;

/// Settings for one backend, derived from the config file
pub fn settings_for(config: &AppConfig, backend: Backend) -> RunSettings {
    RunSettings {
        per_query_quota: config.benchmark.per_query_quota,
        on_error: config.benchmark.on_error,
        seed: config.benchmark.seed,
        backend: Some(backend),
    }
}

/// Catalog for one backend: the configured YAML file or the built-in queries
pub fn catalog_for(config: &AppConfig, backend: Backend) -> Result<QueryCatalog, BenchError> {
    match &config.benchmark.catalog_file {
        Some(path) => {
            let catalog = QueryCatalog::from_yaml_file(path)?;
            tracing::info!(backend = %backend, path = %path, queries = catalog.len(), "Loaded catalog file");
            Ok(catalog)
        }
        None => Ok(QueryCatalog::builtin(backend)),
    }
}

/// Run the full benchmark against one backend.
///
/// The connection is released whether the run succeeds or fails. A failed
/// run returns the error and nothing else; partial aggregates are dropped.
pub async fn run_backend(config: &AppConfig, backend: Backend) -> Result<RunSummary, BenchError> {
    let catalog = catalog_for(config, backend)?;
    let mut session = Session::connect(backend, config.database(backend)).await?;

    let result = {
        let mut harness =
            BenchmarkHarness::new(&catalog, session.executor(), settings_for(config, backend));
        harness.run().await
    };
    session.close().await;

    let summary = result?;
    if let Some(dir) = &config.benchmark.report_dir {
        let path = summary.write_json(dir)?;
        tracing::info!(backend = %backend, path = %path.display(), "Run summary written");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::from_yaml(
            "log_level: info\nlog_dir: ./logs\nlog_file: bench.log\nuse_json: false\nrotation: never\n",
        )
        .unwrap()
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = config();
        config.benchmark.per_query_quota = 4;
        config.benchmark.seed = Some(5);

        let settings = settings_for(&config, Backend::Mysql);
        assert_eq!(settings.per_query_quota, 4);
        assert_eq!(settings.seed, Some(5));
        assert_eq!(settings.backend, Some(Backend::Mysql));
    }

    #[test]
    fn test_builtin_catalog_when_no_file() {
        let catalog = catalog_for(&config(), Backend::Postgres).unwrap();
        assert_eq!(catalog, QueryCatalog::builtin(Backend::Postgres));
    }

    #[test]
    fn test_missing_catalog_file() {
        let mut config = config();
        config.benchmark.catalog_file = Some("/nonexistent/catalog.yaml".to_string());
        assert!(matches!(
            catalog_for(&config, Backend::Postgres),
            Err(BenchError::Io(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL with the benchmark schema loaded
    async fn test_run_backend_postgres() {
        let mut config = config();
        config.benchmark.per_query_quota = 1;
        let summary = run_backend(&config, Backend::Postgres).await.unwrap();
        assert_eq!(summary.total_executions, 7);
    }
}
