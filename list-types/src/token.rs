//! Opaque cursor tokens.
//!
//! A token is the JSON form of a cursor position (reference id plus the raw
//! sort value) encoded as URL-safe base64, so callers can pass it back without
//! caring what it contains.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::{TypeError, Value};

/// A position in an ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorToken {
    /// Public identifier of the boundary record.
    pub id: String,
    /// Raw sort value of the boundary record (absent when sorting by id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl CursorToken {
    /// Create a token for the given record position.
    pub fn new(id: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            id: id.into(),
            value: value.map(Value::raw),
        }
    }

    /// Encode as a URL-safe base64 JSON payload.
    pub fn encode(&self) -> String {
        // A struct of two strings always serializes.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token produced by [`CursorToken::encode`].
    pub fn decode(token: &str) -> Result<Self, TypeError> {
        let json = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| TypeError::InvalidToken(format!("base64 decode: {}", e)))?;

        serde_json::from_slice(&json)
            .map_err(|e| TypeError::InvalidToken(format!("JSON parse: {}", e)))
    }
}
