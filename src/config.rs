use serde::{Deserialize, Serialize};
use std::fs;

use crate::aggregator::RunBudget;
use crate::catalog::Backend;
use crate::error::BenchError;
use crate::harness::ErrorPolicy;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default = "DatabaseConfig::postgres_default")]
    pub postgres: DatabaseConfig,
    #[serde(default = "DatabaseConfig::mysql_default")]
    pub mysql: DatabaseConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BenchmarkConfig {
    pub per_query_quota: u32,
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Fixed shuffle seed for reproducible execution order
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory for JSON run summaries
    #[serde(default)]
    pub report_dir: Option<String>,
    /// YAML catalog used instead of the built-in queries
    #[serde(default)]
    pub catalog_file: Option<String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            per_query_quota: RunBudget::DEFAULT_QUOTA,
            on_error: ErrorPolicy::Fatal,
            seed: None,
            report_dir: None,
            catalog_file: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    pub fn postgres_default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 45432,
            user: "postgres".to_string(),
            password: "root".to_string(),
            database: "benchmark_db".to_string(),
        }
    }

    pub fn mysql_default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 43306,
            user: "mysql".to_string(),
            password: "password".to_string(),
            database: "benchmark_db".to_string(),
        }
    }

    /// Apply `<PREFIX>_USER`-style overrides for one backend
    pub fn apply_env<F>(&mut self, backend: Backend, lookup: F) -> Result<(), BenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (user, password, database, port) = match backend {
            Backend::Postgres => (
                "POSTGRES_USER",
                "POSTGRES_PASSWORD",
                "POSTGRES_DB",
                "POSTGRES_PORT",
            ),
            Backend::Mysql => ("MYSQL_USER", "MYSQL_PASSWORD", "MYSQL_DATABASE", "MYSQL_PORT"),
        };

        if let Some(v) = lookup(user) {
            self.user = v;
        }
        if let Some(v) = lookup(password) {
            self.password = v;
        }
        if let Some(v) = lookup(database) {
            self.database = v;
        }
        if let Some(v) = lookup(port) {
            self.port = v
                .parse()
                .map_err(|_| BenchError::Config(format!("{} is not a valid port: {}", port, v)))?;
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml` and apply environment overrides
    pub fn load(env: &str) -> Result<Self, BenchError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|e| {
            BenchError::Config(format!("Failed to read config file {}: {}", config_path, e))
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, BenchError> {
        serde_yaml::from_str(content)
            .map_err(|e| BenchError::Config(format!("Failed to parse config yaml: {}", e)))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), BenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.postgres.apply_env(Backend::Postgres, &lookup)?;
        self.mysql.apply_env(Backend::Mysql, &lookup)?;
        Ok(())
    }

    pub fn database(&self, backend: Backend) -> &DatabaseConfig {
        match backend {
            Backend::Postgres => &self.postgres,
            Backend::Mysql => &self.mysql,
        }
    }
}
