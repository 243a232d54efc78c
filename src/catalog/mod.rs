//! Query Catalog
//!
//! Fixed, ordered list of named queries. A query's identity is its index.
//! Each backend ships a built-in catalog over the same chain-explorer schema
//! (`Accounts`, `Blocks`, `Transactions`, `Contracts`); only the SQL dialect
//! differs. Custom catalogs can be loaded from YAML.

mod mysql;
mod postgres;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::BenchError;

/// Database backend under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Postgres,
    Mysql,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Postgres, Backend::Mysql];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Backend::Postgres),
            "mysql" => Ok(Backend::Mysql),
            other => Err(BenchError::Config(format!("unknown backend: {}", other))),
        }
    }
}

/// One named benchmark query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub name: String,
    pub text: String,
}

impl QueryDefinition {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Read-only, ordered query set for one harness run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCatalog {
    queries: Vec<QueryDefinition>,
}

impl QueryCatalog {
    pub fn new(queries: Vec<QueryDefinition>) -> Self {
        Self { queries }
    }

    /// Built-in catalog for a backend
    pub fn builtin(backend: Backend) -> Self {
        let defs = match backend {
            Backend::Postgres => postgres::QUERIES,
            Backend::Mysql => mysql::QUERIES,
        };
        Self::new(
            defs.iter()
                .map(|(name, text)| QueryDefinition::new(*name, *text))
                .collect(),
        )
    }

    /// Load a catalog from YAML: `queries: [{ name, text }, ...]`
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
            .map_err(|e| BenchError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, BenchError> {
        serde_yaml::from_str(content).map_err(|e| BenchError::Config(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueryDefinition> {
        self.queries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryDefinition> {
        self.queries.iter()
    }
}
