//! Query Executor - the database seam of the harness
//!
//! The harness only needs "run this text on an open connection and wait".
//! Rows are fetched in full so the measured time includes result transfer.

use async_trait::async_trait;
use sqlx::{MySqlConnection, PgConnection};

/// An open, authenticated connection able to run raw SQL text
#[async_trait]
pub trait QueryExecutor: Send {
    /// Execute `sql` once and return the number of rows received
    async fn execute_query(&mut self, sql: &str) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl QueryExecutor for PgConnection {
    async fn execute_query(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let rows = sqlx::Executor::fetch_all(&mut *self, sqlx::raw_sql(sql)).await?;
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl QueryExecutor for MySqlConnection {
    async fn execute_query(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let rows = sqlx::Executor::fetch_all(&mut *self, sqlx::raw_sql(sql)).await?;
        Ok(rows.len() as u64)
    }
}
