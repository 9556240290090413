//! Error types for list-server.

use list_core::QueryError;

/// Errors returned by the list service.
///
/// These reach the transport layer unchanged; mapping them to user-visible
/// responses is the transport's job. An empty page is not an error.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// Requested sort field is not on the allow-list.
    #[error("invalid sort field: {field}")]
    InvalidSortField {
        /// The rejected field name.
        field: String,
    },

    /// Malformed, contradictory, or mistyped cursor.
    #[error("invalid cursor: {reason}")]
    InvalidCursor {
        /// Why the cursor was rejected.
        reason: String,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<QueryError> for ListError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidSortField { field } => ListError::InvalidSortField { field },
            QueryError::InvalidCursor { reason } => ListError::InvalidCursor { reason },
        }
    }
}

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A returned row did not match the selected columns.
    #[error("row decode error: {reason}")]
    Decode {
        /// What did not match.
        reason: String,
    },

    /// A record to write does not fit the collection.
    #[error("invalid record: {reason}")]
    InvalidRecord {
        /// What did not fit.
        reason: String,
    },
}

/// Startup and serving errors for the binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for list operations.
pub type ListResult<T> = std::result::Result<T, ListError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_keep_their_kind() {
        let err: ListError = QueryError::InvalidSortField {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(err, ListError::InvalidSortField { ref field } if field == "email"));

        let err: ListError = QueryError::InvalidCursor {
            reason: "empty".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid cursor: empty");
    }

    #[test]
    fn storage_errors_wrap() {
        let err: ListError = StorageError::Decode {
            reason: "short row".to_string(),
        }
        .into();
        assert!(matches!(err, ListError::Storage(StorageError::Decode { .. })));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ListError>();
        assert_send_sync::<ServerError>();
    }
}
