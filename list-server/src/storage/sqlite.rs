//! SQLite storage backend for list-server.

use super::{QueryExecutor, Row, Statement};
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use list_core::schema::{quote_identifier, CREATED_AT, DELETED_AT, ID_COLUMN, UPDATED_AT};
use list_core::Collection;
use list_types::{Value, ValueKind};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row as _, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// SQLite-based record storage.
///
/// Timestamps are stored as INTEGER milliseconds since the Unix epoch so they
/// order correctly under plain comparison. Uses WAL mode for concurrent
/// reads/writes.
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

/// A record to insert (or revive) in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Public identifier.
    pub public_id: String,
    /// Attribute values by column name.
    pub attributes: Vec<(String, Value)>,
    /// Creation time (defaults to now).
    pub created_at: Option<DateTime<Utc>>,
}

impl NewRecord {
    /// A record with no attributes.
    pub fn new(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            attributes: Vec::new(),
            created_at: None,
        }
    }

    /// Set an attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the creation time.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

impl SqliteStorage {
    /// Create a new SQLite storage from a database path.
    ///
    /// Creates the database file if it doesn't exist.
    pub async fn new(path: &Path, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create an in-memory SQLite storage (for testing).
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(":memory:")?;

        // One connection, never recycled: each connection has its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create a collection's table and its keyset indexes if missing.
    ///
    /// Each sortable field gets a `(field, identifier)` index so the keyset
    /// predicate stays an index range scan.
    pub async fn ensure_collection(&self, collection: &Collection) -> Result<(), StorageError> {
        let table = quote_identifier(collection.table);
        let identifier = quote_identifier(collection.identifier);

        let mut columns = vec![
            format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quote_identifier(ID_COLUMN)),
            format!("{identifier} TEXT NOT NULL UNIQUE"),
        ];
        for field in collection.fields {
            let not_null = if field.sortable { " NOT NULL" } else { "" };
            columns.push(format!(
                "{} {}{}",
                quote_identifier(field.name),
                sql_type(field.kind),
                not_null
            ));
        }
        columns.push(format!("{} INTEGER NOT NULL", quote_identifier(CREATED_AT)));
        columns.push(format!("{} INTEGER NOT NULL", quote_identifier(UPDATED_AT)));
        columns.push(format!("{} INTEGER", quote_identifier(DELETED_AT)));

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} ({})",
            columns.join(", ")
        ))
        .execute(&self.pool)
        .await?;

        let sortable = collection
            .fields
            .iter()
            .filter(|f| f.sortable)
            .map(|f| f.name)
            .chain([CREATED_AT, UPDATED_AT]);

        for field in sortable {
            let index = quote_identifier(&format!("idx_{}_{}", collection.table, field));
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {index} ON {table} ({}, {identifier})",
                quote_identifier(field)
            ))
            .execute(&self.pool)
            .await?;
        }

        tracing::debug!("Ensured collection {}", collection.table);
        Ok(())
    }

    /// Insert a record, or revive and overwrite a soft-deleted one with the
    /// same identifier.
    ///
    /// Returns the internal id.
    pub async fn insert(&self, collection: &Collection, record: NewRecord) -> Result<i64, StorageError> {
        for (name, value) in &record.attributes {
            let field = collection
                .fields
                .iter()
                .find(|f| f.name == name.as_str())
                .ok_or_else(|| StorageError::InvalidRecord {
                    reason: format!("{} has no column {}", collection.table, name),
                })?;
            if field.kind != value.kind() {
                return Err(StorageError::InvalidRecord {
                    reason: format!("{} is {}, got {}", name, field.kind, value.kind()),
                });
            }
        }

        let now = Utc::now();
        let created_at = record.created_at.unwrap_or(now);

        let mut names = vec![quote_identifier(collection.identifier)];
        let mut params = vec![Value::Text(record.public_id)];
        for (name, value) in record.attributes {
            names.push(quote_identifier(&name));
            params.push(value);
        }
        names.push(quote_identifier(CREATED_AT));
        params.push(Value::Timestamp(created_at));
        names.push(quote_identifier(UPDATED_AT));
        params.push(Value::Timestamp(now));

        let updates: Vec<String> = names[1..]
            .iter()
            .map(|n| format!("{n} = excluded.{n}"))
            .chain([format!("{} = NULL", quote_identifier(DELETED_AT))])
            .collect();
        let placeholders = vec!["?"; names.len()].join(", ");

        let sql = format!(
            "INSERT INTO {table} ({names}) VALUES ({placeholders}) \
             ON CONFLICT({identifier}) DO UPDATE SET {updates} \
             RETURNING {id}",
            table = quote_identifier(collection.table),
            names = names.join(", "),
            identifier = quote_identifier(collection.identifier),
            updates = updates.join(", "),
            id = quote_identifier(ID_COLUMN),
        );

        let id: i64 = bind_all(sqlx::query(&sql), &params)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;

        Ok(id)
    }

    /// Soft-delete a live record.
    ///
    /// Returns `false` if no live record has that identifier.
    pub async fn soft_delete(&self, collection: &Collection, public_id: &str) -> Result<bool, StorageError> {
        let now = Value::Timestamp(Utc::now());
        let sql = format!(
            "UPDATE {} SET {deleted} = ?, {} = ? WHERE {} = ? AND {deleted} IS NULL",
            quote_identifier(collection.table),
            quote_identifier(UPDATED_AT),
            quote_identifier(collection.identifier),
            deleted = quote_identifier(DELETED_AT),
        );

        let result = bind_all(sqlx::query(&sql), &[now.clone(), now, Value::from(public_id)])
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl QueryExecutor for SqliteStorage {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>, StorageError> {
        let rows = bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| decode_row(statement, row)).collect()
    }
}

fn sql_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Integer | ValueKind::Timestamp => "INTEGER",
        ValueKind::Text => "TEXT",
    }
}

/// Bind values positionally, timestamps as epoch milliseconds.
fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Integer(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Timestamp(v) => query.bind(v.timestamp_millis()),
        };
    }
    query
}

fn decode_row(statement: &Statement, row: &SqliteRow) -> Result<Row, StorageError> {
    statement
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| -> Result<Option<Value>, StorageError> {
            let value = match column.kind {
                ValueKind::Integer => row.try_get::<Option<i64>, _>(idx)?.map(Value::Integer),
                ValueKind::Text => row.try_get::<Option<String>, _>(idx)?.map(Value::Text),
                ValueKind::Timestamp => match row.try_get::<Option<i64>, _>(idx)? {
                    Some(ms) => Some(Value::Timestamp(DateTime::from_timestamp_millis(ms).ok_or_else(
                        || StorageError::Decode {
                            reason: format!("{} holds out-of-range timestamp {}", column.name, ms),
                        },
                    )?)),
                    None => None,
                },
            };
            Ok(value)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Row)
}
