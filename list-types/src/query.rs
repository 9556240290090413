//! List request types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// Sort direction of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl SortOrder {
    /// Return the opposite sort direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(TypeError::InvalidSortOrder(s.to_string()))
        }
    }
}

/// A list request as decoded by the transport layer.
///
/// Fields are raw primitives; validation against a collection happens when the
/// request is handed to the list service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Free-text filter term.
    pub query: Option<String>,
    /// Sort field (defaults to the collection identifier).
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Requested page size (clamped, never rejected).
    pub limit: Option<i64>,
    /// Reference id of the record to page after.
    pub after_id: Option<String>,
    /// Sort value of the record to page after.
    pub after_value: Option<String>,
    /// Reference id of the record to page before.
    pub before_id: Option<String>,
    /// Sort value of the record to page before.
    pub before_value: Option<String>,
}

impl ListQuery {
    /// Whether this request pages backwards.
    pub fn is_before(&self) -> bool {
        self.before_id.is_some()
    }
}
