//! # list-server
//!
//! Keyset-paginated listings over soft-deletable SQLite tables.
//!
//! This crate runs the list pipeline end to end:
//! - Decodes list requests (sort field, order, cursor, filter, limit)
//! - Builds a parameterized keyset predicate with `list-core`
//! - Executes it against SQLite and maps rows to records
//! - Serves `GET /v1/users` and `GET /v1/features` over HTTP
//!
//! ## Architecture
//!
//! ```text
//!   HTTP query params
//!          │
//!    ┌─────▼──────┐   sort spec, cursor, limit   ┌─────────────┐
//!    │ ListService├─────────────────────────────►│  list-core  │
//!    └─────┬──────┘◄──── Predicate ──────────────┴─────────────┘
//!          │
//!    ┌─────▼───────┐  SELECT ... WHERE ... LIMIT ?
//!    │PageExecutor ├──────────────► QueryExecutor (SQLite)
//!    └─────────────┘
//! ```
//!
//! ## Paging
//!
//! Pages are keyed on `(sort value, identifier)` of a boundary record, never
//! on offsets, so inserts and soft deletes between requests neither skip nor
//! repeat surviving rows.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod record;
pub mod server;
pub mod service;
pub mod storage;
