//! Cursor decoding.
//!
//! A cursor names a position in the ordered result stream: the public id of a
//! boundary record plus, when sorting by anything other than the id, that
//! record's sort value. Decoding validates the raw transport fields against the
//! sort spec; it never touches storage.

use list_types::{CursorToken, ListQuery, Value};

use crate::{QueryError, SortSpec};

/// A boundary record position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Public identifier of the boundary record.
    pub id: String,
    /// Sort value of the boundary record; `None` when sorting by identifier.
    pub value: Option<Value>,
}

impl Position {
    /// Create a position.
    pub fn new(id: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    /// Opaque token for this position.
    pub fn token(&self) -> CursorToken {
        CursorToken::new(self.id.clone(), self.value.as_ref())
    }
}

/// Where a page starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// First page.
    #[default]
    None,
    /// Rows strictly after the position, in sort order.
    After(Position),
    /// Rows strictly before the position, nearest first.
    Before(Position),
}

impl Cursor {
    /// Page forward from a position.
    pub fn after(id: impl Into<String>, value: Option<Value>) -> Self {
        Cursor::After(Position::new(id, value))
    }

    /// Page backward from a position.
    pub fn before(id: impl Into<String>, value: Option<Value>) -> Self {
        Cursor::Before(Position::new(id, value))
    }

    /// The boundary position, if any.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Cursor::None => None,
            Cursor::After(p) | Cursor::Before(p) => Some(p),
        }
    }

    /// Whether this cursor pages backward.
    pub fn is_before(&self) -> bool {
        matches!(self, Cursor::Before(_))
    }
}

/// Decode one boundary position against a sort spec.
///
/// `reference_id` must be non-blank. When the sort field is the identifier any
/// value is dropped; otherwise a value is required and must coerce to the sort
/// field's type.
pub fn decode_position(
    spec: &SortSpec,
    reference_id: &str,
    sort_value: Option<&str>,
) -> Result<Position, QueryError> {
    if reference_id.trim().is_empty() {
        return Err(QueryError::cursor("reference id is empty"));
    }

    if spec.sorts_by_identifier() {
        return Ok(Position::new(reference_id, None));
    }

    let raw = sort_value.ok_or_else(|| {
        QueryError::cursor(format!("a {} value is required when sorting by it", spec.field()))
    })?;
    let value = Value::coerce(spec.kind(), raw).map_err(|e| QueryError::cursor(e.to_string()))?;

    Ok(Position::new(reference_id, Some(value)))
}

/// Decode the cursor fields of a list request.
pub fn decode(spec: &SortSpec, query: &ListQuery) -> Result<Cursor, QueryError> {
    match (&query.after_id, &query.before_id) {
        (Some(_), Some(_)) => Err(QueryError::cursor(
            "after and before are mutually exclusive",
        )),
        (Some(id), None) => {
            if query.before_value.is_some() {
                return Err(QueryError::cursor("before value given without a before id"));
            }
            decode_position(spec, id, query.after_value.as_deref()).map(Cursor::After)
        }
        (None, Some(id)) => {
            if query.after_value.is_some() {
                return Err(QueryError::cursor("after value given without an after id"));
            }
            decode_position(spec, id, query.before_value.as_deref()).map(Cursor::Before)
        }
        (None, None) => {
            if query.after_value.is_some() || query.before_value.is_some() {
                return Err(QueryError::cursor("sort value given without a reference id"));
            }
            Ok(Cursor::None)
        }
    }
}
