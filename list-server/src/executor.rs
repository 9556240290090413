//! Page execution.
//!
//! Wraps a [`Predicate`] in a `SELECT` over the collection's columns, runs it
//! on a [`QueryExecutor`], and maps rows to [`ResourceRecord`]s in the order
//! the backend returned them.

use crate::error::StorageError;
use crate::record::ResourceRecord;
use crate::storage::{QueryExecutor, Row, Statement};
use chrono::{DateTime, Utc};
use list_core::schema::{quote_identifier, CREATED_AT, DELETED_AT, ID_COLUMN, UPDATED_AT};
use list_core::{Collection, Column, Predicate};
use list_types::Value;
use std::collections::BTreeMap;

/// Runs predicates against a backend.
#[derive(Debug, Clone)]
pub struct PageExecutor<E> {
    executor: E,
}

impl<E: QueryExecutor> PageExecutor<E> {
    /// Create a page executor over a backend.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get access to the backend.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Compose the full statement for a predicate.
    pub fn statement(collection: &Collection, predicate: &Predicate) -> Statement {
        let columns = collection.columns();
        let names: Vec<String> = columns.iter().map(|c| quote_identifier(c.name)).collect();

        Statement {
            sql: format!(
                "SELECT {} FROM {} WHERE {}",
                names.join(", "),
                quote_identifier(collection.table),
                predicate.clause()
            ),
            params: predicate.params().to_vec(),
            columns,
        }
    }

    /// Fetch one page. Returns at most `predicate.limit()` records.
    pub async fn execute(
        &self,
        collection: &Collection,
        predicate: &Predicate,
    ) -> Result<Vec<ResourceRecord>, StorageError> {
        let statement = Self::statement(collection, predicate);
        let rows = self.executor.fetch(&statement).await?;

        rows.into_iter()
            .take(predicate.limit() as usize)
            .map(|row| to_record(&statement.columns, row))
            .collect()
    }
}

fn to_record(columns: &[Column], Row(values): Row) -> Result<ResourceRecord, StorageError> {
    if values.len() != columns.len() {
        return Err(StorageError::Decode {
            reason: format!("expected {} columns, got {}", columns.len(), values.len()),
        });
    }

    let mut id = None;
    let mut public_id = None;
    let mut created_at = None;
    let mut updated_at = None;
    let mut deleted_at = None;
    let mut attributes = BTreeMap::new();

    // Row layout is id, identifier, attributes..., createdAt, updatedAt, deletedAt.
    let last = columns.len() - 1;
    for (idx, (column, value)) in columns.iter().zip(values).enumerate() {
        match (idx, column.name) {
            (0, ID_COLUMN) => id = Some(integer(column, value)?),
            (1, _) => public_id = Some(text(column, value)?),
            (i, CREATED_AT) if i == last - 2 => created_at = Some(timestamp(column, value)?),
            (i, UPDATED_AT) if i == last - 1 => updated_at = Some(timestamp(column, value)?),
            (i, DELETED_AT) if i == last => {
                deleted_at = value.map(|v| timestamp(column, Some(v))).transpose()?
            }
            _ => {
                if let Some(value) = value {
                    attributes.insert(column.name.to_string(), value);
                }
            }
        }
    }

    let missing = |what: &str| StorageError::Decode {
        reason: format!("row has no {what} column"),
    };

    Ok(ResourceRecord {
        id: id.ok_or_else(|| missing(ID_COLUMN))?,
        public_id: public_id.ok_or_else(|| missing("identifier"))?,
        attributes,
        created_at: created_at.ok_or_else(|| missing(CREATED_AT))?,
        updated_at: updated_at.ok_or_else(|| missing(UPDATED_AT))?,
        deleted_at,
    })
}

fn mismatch(column: &Column, value: &Option<Value>) -> StorageError {
    StorageError::Decode {
        reason: format!("{} holds {:?}, expected {}", column.name, value, column.kind),
    }
}

fn integer(column: &Column, value: Option<Value>) -> Result<i64, StorageError> {
    match value {
        Some(Value::Integer(v)) => Ok(v),
        other => Err(mismatch(column, &other)),
    }
}

fn text(column: &Column, value: Option<Value>) -> Result<String, StorageError> {
    match value {
        Some(Value::Text(v)) => Ok(v),
        other => Err(mismatch(column, &other)),
    }
}

fn timestamp(column: &Column, value: Option<Value>) -> Result<DateTime<Utc>, StorageError> {
    match value {
        Some(Value::Timestamp(v)) => Ok(v),
        other => Err(mismatch(column, &other)),
    }
}
