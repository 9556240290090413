//! Collection descriptors and the sort allow-list.
//!
//! Every listed table has the same fixed columns (`id`, `createdAt`,
//! `updatedAt`, `deletedAt`), one unique public identifier column, and any
//! number of attribute columns. Only names declared here ever reach SQL text.

use list_types::{SortOrder, ValueKind};

use crate::QueryError;

/// Internal numeric primary key column.
pub const ID_COLUMN: &str = "id";
/// Creation timestamp column.
pub const CREATED_AT: &str = "createdAt";
/// Last update timestamp column.
pub const UPDATED_AT: &str = "updatedAt";
/// Soft-delete timestamp column (NULL while the record is live).
pub const DELETED_AT: &str = "deletedAt";

/// An attribute column of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: &'static str,
    /// Declared value type.
    pub kind: ValueKind,
    /// Whether the field is on the sort allow-list (implies NOT NULL).
    pub sortable: bool,
    /// Whether free-text filters match against this field.
    pub searchable: bool,
}

impl Field {
    /// A nullable text attribute.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ValueKind::Text)
    }

    /// A nullable integer attribute.
    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, ValueKind::Integer)
    }

    /// A nullable timestamp attribute.
    pub const fn timestamp(name: &'static str) -> Self {
        Self::new(name, ValueKind::Timestamp)
    }

    const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            sortable: false,
            searchable: false,
        }
    }

    /// Put this field on the sort allow-list.
    pub const fn sortable(self) -> Self {
        Self {
            sortable: true,
            ..self
        }
    }

    /// Match free-text filters against this field.
    pub const fn searchable(self) -> Self {
        Self {
            searchable: true,
            ..self
        }
    }
}

/// A selected column with its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: &'static str,
    /// Declared value type.
    pub kind: ValueKind,
    /// Whether storage may hold NULL here.
    pub nullable: bool,
}

/// A listed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    /// Table name.
    pub table: &'static str,
    /// Public string identifier column (unique, tiebreak key).
    pub identifier: &'static str,
    /// Attribute columns.
    pub fields: &'static [Field],
}

/// Users: `userId`, searchable `email`.
pub const USERS: Collection = Collection {
    table: "user",
    identifier: "userId",
    fields: &[Field::text("email").searchable()],
};

/// Features: `featureId`, sortable `name`, searchable `description`.
pub const FEATURES: Collection = Collection {
    table: "feature",
    identifier: "featureId",
    fields: &[
        Field::text("name").sortable().searchable(),
        Field::text("description").searchable(),
    ],
};

impl Collection {
    /// Look up a field on the sort allow-list.
    ///
    /// Returns the canonical column name and its type.
    pub fn sortable(&self, name: &str) -> Option<(&'static str, ValueKind)> {
        if name == self.identifier {
            return Some((self.identifier, ValueKind::Text));
        }
        if name == CREATED_AT {
            return Some((CREATED_AT, ValueKind::Timestamp));
        }
        if name == UPDATED_AT {
            return Some((UPDATED_AT, ValueKind::Timestamp));
        }
        self.fields
            .iter()
            .find(|f| f.sortable && f.name == name)
            .map(|f| (f.name, f.kind))
    }

    /// Columns matched by free-text filters, identifier first.
    pub fn searchable(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.identifier).chain(
            self.fields
                .iter()
                .filter(|f| f.searchable && f.kind == ValueKind::Text)
                .map(|f| f.name),
        )
    }

    /// Every column a listing selects, in row order.
    pub fn columns(&self) -> Vec<Column> {
        let fixed = |name, kind, nullable| Column {
            name,
            kind,
            nullable,
        };

        let mut columns = vec![
            fixed(ID_COLUMN, ValueKind::Integer, false),
            fixed(self.identifier, ValueKind::Text, false),
        ];
        columns.extend(self.fields.iter().map(|f| Column {
            name: f.name,
            kind: f.kind,
            nullable: !f.sortable,
        }));
        columns.push(fixed(CREATED_AT, ValueKind::Timestamp, false));
        columns.push(fixed(UPDATED_AT, ValueKind::Timestamp, false));
        columns.push(fixed(DELETED_AT, ValueKind::Timestamp, true));
        columns
    }

    /// Resolve a requested sort against the allow-list.
    ///
    /// `None` sorts by the identifier.
    pub fn sort_spec(&self, field: Option<&str>, order: SortOrder) -> Result<SortSpec, QueryError> {
        let requested = field.unwrap_or(self.identifier);
        let (field, kind) =
            self.sortable(requested)
                .ok_or_else(|| QueryError::InvalidSortField {
                    field: requested.to_string(),
                })?;

        Ok(SortSpec {
            field,
            kind,
            order,
            identifier: self.identifier,
        })
    }
}

/// A validated sort: allow-listed field, direction, and identifier tiebreak.
///
/// Only obtainable from [`Collection::sort_spec`], so the field name is always
/// safe to place in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    field: &'static str,
    kind: ValueKind,
    order: SortOrder,
    identifier: &'static str,
}

impl SortSpec {
    /// Primary sort column.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Type of the primary sort column.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Requested direction.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Tiebreak column (the collection identifier).
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Whether the primary sort column is the identifier itself.
    pub fn sorts_by_identifier(&self) -> bool {
        self.field == self.identifier
    }
}

/// Quote an identifier for SQL text.
///
/// Embedded double quotes are doubled per SQL standard (`"` → `""`).
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_and_audit_columns_are_sortable() {
        assert_eq!(USERS.sortable("userId"), Some(("userId", ValueKind::Text)));
        assert_eq!(USERS.sortable("createdAt"), Some(("createdAt", ValueKind::Timestamp)));
        assert_eq!(USERS.sortable("updatedAt"), Some(("updatedAt", ValueKind::Timestamp)));
    }

    #[test]
    fn only_flagged_fields_are_sortable() {
        assert_eq!(FEATURES.sortable("name"), Some(("name", ValueKind::Text)));
        assert_eq!(FEATURES.sortable("description"), None);
        assert_eq!(USERS.sortable("email"), None);
    }

    #[test]
    fn internal_and_delete_columns_are_not_sortable() {
        assert_eq!(USERS.sortable("id"), None);
        assert_eq!(USERS.sortable("deletedAt"), None);
    }

    #[test]
    fn sort_field_lookup_is_exact() {
        assert_eq!(USERS.sortable("userid"), None);
        assert_eq!(USERS.sortable("userId; DROP TABLE user"), None);
    }

    #[test]
    fn sort_spec_defaults_to_identifier() {
        let spec = USERS.sort_spec(None, SortOrder::Desc).unwrap();
        assert_eq!(spec.field(), "userId");
        assert!(spec.sorts_by_identifier());
        assert_eq!(spec.order(), SortOrder::Desc);
    }

    #[test]
    fn sort_spec_rejects_unlisted_field() {
        let err = USERS.sort_spec(Some("email"), SortOrder::Asc).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidSortField {
                field: "email".to_string()
            }
        );
    }

    #[test]
    fn searchable_starts_with_identifier() {
        let cols: Vec<_> = FEATURES.searchable().collect();
        assert_eq!(cols, vec!["featureId", "name", "description"]);
    }

    #[test]
    fn columns_in_row_order() {
        let names: Vec<_> = USERS.columns().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["id", "userId", "email", "createdAt", "updatedAt", "deletedAt"]
        );
        let deleted = USERS.columns().pop().unwrap();
        assert!(deleted.nullable);
    }

    #[test]
    fn quote_identifier_doubles_quotes() {
        assert_eq!(quote_identifier("userId"), "\"userId\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
