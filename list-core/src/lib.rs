//! # list-core
//!
//! Pure keyset pagination logic (no I/O, instant tests).
//!
//! This crate turns a list request into a parameterized SQL predicate:
//! - [`schema`] - Collection descriptors and the sortable-field allow-list
//! - [`limit`] - Page size clamping
//! - [`codec`] - Cursor decoding and validation
//! - [`predicate`] - WHERE / ORDER BY / LIMIT construction
//!
//! ## Design Philosophy
//!
//! Nothing here touches storage. A [`Predicate`] is plain text plus ordered
//! bind parameters; `list-server` hands it to whichever backend implements its
//! query executor trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod limit;
pub mod predicate;
pub mod schema;

pub use codec::{Cursor, Position};
pub use error::QueryError;
pub use limit::LimitPolicy;
pub use predicate::Predicate;
pub use schema::{Collection, Column, Field, SortSpec, FEATURES, USERS};
