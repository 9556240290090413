//! Storage layer for list-server.
//!
//! The list pipeline only needs one capability from a backend: run a
//! parameterized `SELECT` and hand back typed rows. Anything implementing
//! [`QueryExecutor`] can serve listings.

mod sqlite;

pub use sqlite::{NewRecord, SqliteStorage};

use crate::error::StorageError;
use async_trait::async_trait;
use list_core::Column;
use list_types::Value;

/// A parameterized statement with its declared result columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with positional `?` placeholders.
    pub sql: String,
    /// Bind parameters in placeholder order.
    pub params: Vec<Value>,
    /// Selected columns, in row order.
    pub columns: Vec<Column>,
}

/// One result row: column values in [`Statement::columns`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(pub Vec<Option<Value>>);

/// Trait for query execution backends.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a statement and return its rows in backend order.
    ///
    /// An empty result is `Ok(vec![])`, never an error. Failures are not
    /// retried here.
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>, StorageError>;
}
