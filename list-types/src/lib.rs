//! # list-types
//!
//! Value and request types shared by the keyset list crates.
//!
//! This crate provides the foundational types used across all crates:
//! - [`Value`], [`ValueKind`] - Typed sort keys and bind parameters
//! - [`SortOrder`] - Ascending / descending
//! - [`ListQuery`] - A list request as decoded by the transport layer
//! - [`CursorToken`] - Opaque, URL-safe cursor encoding
//! - [`TypeError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod query;
mod token;
mod value;

pub use error::TypeError;
pub use query::{ListQuery, SortOrder};
pub use token::CursorToken;
pub use value::{Value, ValueKind};
