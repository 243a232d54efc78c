//! Database connection management
//!
//! One dedicated connection per harness. The caller acquires it before the
//! run and closes it afterwards whatever the outcome.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};

use crate::catalog::Backend;
use crate::config::DatabaseConfig;
use crate::error::BenchError;
use crate::executor::QueryExecutor;

pub fn pg_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
}

pub fn mysql_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
}

/// An open connection to one of the supported backends
pub enum Session {
    Postgres(PgConnection),
    Mysql(MySqlConnection),
}

impl Session {
    /// Open a single connection. Failure here is fatal to the run.
    pub async fn connect(backend: Backend, config: &DatabaseConfig) -> Result<Self, BenchError> {
        let session = match backend {
            Backend::Postgres => pg_options(config).connect().await.map(Session::Postgres),
            Backend::Mysql => mysql_options(config).connect().await.map(Session::Mysql),
        }
        .map_err(|source| BenchError::Connection {
            index: None,
            name: None,
            completed: 0,
            source,
        })?;

        tracing::info!(
            backend = %backend,
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connection established"
        );
        Ok(session)
    }

    pub fn backend(&self) -> Backend {
        match self {
            Session::Postgres(_) => Backend::Postgres,
            Session::Mysql(_) => Backend::Mysql,
        }
    }

    pub fn executor(&mut self) -> &mut dyn QueryExecutor {
        match self {
            Session::Postgres(conn) => conn,
            Session::Mysql(conn) => conn,
        }
    }

    /// Check database health
    pub async fn health_check(&mut self) -> Result<(), sqlx::Error> {
        self.executor().execute_query("SELECT 1").await.map(|_| ())
    }

    /// Close the connection; errors are logged, not returned
    pub async fn close(self) {
        let backend = self.backend();
        let result = match self {
            Session::Postgres(conn) => conn.close().await,
            Session::Mysql(conn) => conn.close().await,
        };
        match result {
            Ok(()) => tracing::info!(backend = %backend, "Connection closed"),
            Err(e) => tracing::warn!(backend = %backend, "Failed to close connection: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    // Note: tests marked #[ignore] need the benchmark databases running
    // on the default ports (45432 / 43306).

    #[test]
    fn test_options_from_config() {
        let config = DatabaseConfig::postgres_default();
        let opts = pg_options(&config);
        assert_eq!(opts.get_host(), "localhost");
        assert_eq!(opts.get_port(), 45432);
        assert_eq!(opts.get_database(), Some("benchmark_db"));
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL running
    async fn test_postgres_connect_and_health() {
        let mut session = Session::connect(Backend::Postgres, &DatabaseConfig::postgres_default())
            .await
            .expect("Failed to connect");
        assert_eq!(session.backend(), Backend::Postgres);
        assert!(session.health_check().await.is_ok());
        session.close().await;
    }

    #[tokio::test]
    #[ignore] // Requires MySQL running
    async fn test_mysql_connect_and_health() {
        let mut session = Session::connect(Backend::Mysql, &DatabaseConfig::mysql_default())
            .await
            .expect("Failed to connect");
        assert!(session.health_check().await.is_ok());
        session.close().await;
    }

    #[tokio::test]
    #[ignore]
    async fn test_connect_invalid_port() {
        let mut config = DatabaseConfig::postgres_default();
        config.port = 9;
        let err = Session::connect(Backend::Postgres, &config).await.err();
        assert!(matches!(err, Some(BenchError::Connection { completed: 0, .. })));
    }
}
