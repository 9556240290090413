//! Typed column values.
//!
//! A [`Value`] is both the decoded sort key carried by a cursor and a
//! positional bind parameter handed to the storage backend.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

use crate::TypeError;

/// The declared type of a listed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit signed integer.
    Integer,
    /// UTF-8 text.
    Text,
    /// UTC instant.
    Timestamp,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
            ValueKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A typed scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
    /// Timestamp value (serialized as RFC 3339).
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Coerce a raw request string into a value of the given kind.
    ///
    /// Timestamps accept RFC 3339 or integer milliseconds since the epoch.
    pub fn coerce(kind: ValueKind, raw: &str) -> Result<Self, TypeError> {
        let err = || TypeError::Coercion {
            kind,
            raw: raw.to_string(),
        };

        match kind {
            ValueKind::Text => Ok(Value::Text(raw.to_string())),
            ValueKind::Integer => raw.trim().parse::<i64>().map(Value::Integer).map_err(|_| err()),
            ValueKind::Timestamp => {
                let trimmed = raw.trim();
                if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
                    return Ok(Value::Timestamp(ts.with_timezone(&Utc)));
                }
                trimmed
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis)
                    .map(Value::Timestamp)
                    .ok_or_else(err)
            }
        }
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Text(_) => ValueKind::Text,
            Value::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Render the raw textual form accepted by [`Value::coerce`].
    pub fn raw(&self) -> String {
        match self {
            Value::Integer(v) => v.to_string(),
            Value::Text(v) => v.clone(),
            Value::Timestamp(v) => v.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}
