//! Request validation errors.

use thiserror::Error;

/// Errors raised while turning a list request into a predicate.
///
/// Both variants are detected before any query executes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The sort field is not on the collection's allow-list.
    #[error("invalid sort field: {field}")]
    InvalidSortField {
        /// The rejected field name.
        field: String,
    },

    /// The cursor is malformed, contradictory or has a mistyped value.
    #[error("invalid cursor: {reason}")]
    InvalidCursor {
        /// Why the cursor was rejected.
        reason: String,
    },
}

impl QueryError {
    pub(crate) fn cursor(reason: impl Into<String>) -> Self {
        QueryError::InvalidCursor {
            reason: reason.into(),
        }
    }
}
