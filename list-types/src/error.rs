//! Error types for list values and requests.

use thiserror::Error;

use crate::ValueKind;

/// Errors raised while interpreting raw request values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A raw string could not be coerced to the declared column type.
    #[error("cannot read {raw:?} as {kind}")]
    Coercion {
        /// The declared column type.
        kind: ValueKind,
        /// The offending input.
        raw: String,
    },

    /// Sort order was neither `asc` nor `desc`.
    #[error("invalid sort order {0:?}: expected \"asc\" or \"desc\"")]
    InvalidSortOrder(String),

    /// A cursor token was not valid base64 JSON.
    #[error("invalid cursor token: {0}")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypeError::Coercion {
            kind: ValueKind::Integer,
            raw: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "cannot read \"abc\" as integer");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeError>();
    }
}
