//! Listed resource records.

use chrono::{DateTime, Utc};
use list_core::schema::{CREATED_AT, UPDATED_AT};
use list_core::{Cursor, Position, SortSpec};
use list_types::Value;
use std::collections::BTreeMap;

/// A soft-deletable record of a listed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Internal primary key (assigned by storage).
    pub id: i64,
    /// Public identifier (unique, tiebreak key, cursor reference).
    pub public_id: String,
    /// Non-null attribute values by column name.
    pub attributes: BTreeMap<String, Value>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete time; listings never return records where this is set.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ResourceRecord {
    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// This record's value for the sort field.
    pub fn sort_value(&self, spec: &SortSpec) -> Option<Value> {
        match spec.field() {
            f if f == spec.identifier() => Some(Value::Text(self.public_id.clone())),
            CREATED_AT => Some(Value::Timestamp(self.created_at)),
            UPDATED_AT => Some(Value::Timestamp(self.updated_at)),
            f => self.attributes.get(f).cloned(),
        }
    }

    /// Cursor position at this record under the given sort.
    pub fn position(&self, spec: &SortSpec) -> Position {
        let value = if spec.sorts_by_identifier() {
            None
        } else {
            self.sort_value(spec)
        };
        Position::new(self.public_id.clone(), value)
    }

    /// Cursor for the rows following this record.
    pub fn cursor_after(&self, spec: &SortSpec) -> Cursor {
        Cursor::After(self.position(spec))
    }

    /// Cursor for the rows preceding this record.
    pub fn cursor_before(&self, spec: &SortSpec) -> Cursor {
        Cursor::Before(self.position(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use list_core::{Collection, Field};
    use list_types::SortOrder;

    const SCORES: Collection = Collection {
        table: "score",
        identifier: "userId",
        fields: &[Field::integer("score").sortable()],
    };

    fn record() -> ResourceRecord {
        let ts = DateTime::from_timestamp_millis(1_000).unwrap();
        ResourceRecord {
            id: 1,
            public_id: "u1".to_string(),
            attributes: BTreeMap::from([("score".to_string(), Value::Integer(10))]),
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    #[test]
    fn position_carries_sort_value() {
        let spec = SCORES.sort_spec(Some("score"), SortOrder::Asc).unwrap();
        assert_eq!(
            record().position(&spec),
            Position::new("u1", Some(Value::Integer(10)))
        );
    }

    #[test]
    fn identifier_position_has_no_value() {
        let spec = SCORES.sort_spec(None, SortOrder::Asc).unwrap();
        assert_eq!(record().position(&spec), Position::new("u1", None));
        assert_eq!(record().sort_value(&spec), Some(Value::Text("u1".to_string())));
    }

    #[test]
    fn cursors_point_at_record() {
        let spec = SCORES.sort_spec(Some("score"), SortOrder::Desc).unwrap();
        let rec = record();
        assert_eq!(
            rec.cursor_after(&spec),
            Cursor::after("u1", Some(Value::Integer(10)))
        );
        assert!(rec.cursor_before(&spec).is_before());
    }

    #[test]
    fn audit_columns_are_sort_values() {
        let spec = SCORES.sort_spec(Some("createdAt"), SortOrder::Asc).unwrap();
        let rec = record();
        assert_eq!(rec.sort_value(&spec), Some(Value::Timestamp(rec.created_at)));
    }
}
