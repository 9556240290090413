//! Keyset predicate construction.
//!
//! Builds the text following `WHERE` for one page of a listing, with every
//! request-supplied value bound positionally (`?`) in textual order:
//!
//! ```text
//! "deletedAt" IS NULL
//!   AND (LOWER("userId") LIKE ? ESCAPE '\' OR LOWER("email") LIKE ? ESCAPE '\')
//!   AND ("score" > ? OR ("userId" > ? AND "score" = ?))
//!   ORDER BY "score" ASC, "userId" ASC
//!   LIMIT ?
//! ```
//!
//! The sort field alone cannot separate rows that share a sort value, so the
//! cursor comparison falls through to the unique identifier on ties. The
//! identifier's ORDER BY direction always matches the sort field's; the
//! comparison operators depend on it.
//!
//! `before` cursors query in the reverse direction so that `LIMIT` keeps the
//! rows nearest the cursor. Those pages come back nearest-first.

use list_types::{SortOrder, Value};

use crate::schema::{quote_identifier, DELETED_AT};
use crate::{Collection, Cursor, QueryError, SortSpec};

/// A WHERE clause fragment and its ordered bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clause: String,
    params: Vec<Value>,
    limit: u32,
    order: SortOrder,
}

impl Predicate {
    /// Text following `WHERE`, through `LIMIT ?`.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Bind parameters in placeholder order; the limit is last.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Page size bound into the clause.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Direction rows are returned in.
    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Build the predicate for one page.
///
/// `limit` is expected to be clamped already. Fails only when the cursor does
/// not fit the sort spec (missing or mistyped sort value).
pub fn build(
    collection: &Collection,
    filter: Option<&str>,
    spec: &SortSpec,
    cursor: &Cursor,
    limit: u32,
) -> Result<Predicate, QueryError> {
    let sort = quote_identifier(spec.field());
    let id = quote_identifier(spec.identifier());

    let mut clause = format!("{} IS NULL", quote_identifier(DELETED_AT));
    let mut params = Vec::new();

    if let Some(term) = filter.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        let matches: Vec<String> = collection
            .searchable()
            .map(|col| {
                params.push(Value::Text(pattern.clone()));
                format!("LOWER({}) LIKE ? ESCAPE '\\'", quote_identifier(col))
            })
            .collect();
        clause.push_str(&format!(" AND ({})", matches.join(" OR ")));
    }

    let order = match cursor {
        Cursor::Before(_) => spec.order().reversed(),
        _ => spec.order(),
    };

    if let Some(position) = cursor.position() {
        let op = match order {
            SortOrder::Asc => '>',
            SortOrder::Desc => '<',
        };
        let reference = Value::Text(position.id.clone());

        if spec.sorts_by_identifier() {
            clause.push_str(&format!(" AND {id} {op} ?"));
            params.push(reference);
        } else {
            let value = position.value.clone().ok_or_else(|| {
                QueryError::cursor(format!("cursor has no {} value", spec.field()))
            })?;
            if value.kind() != spec.kind() {
                return Err(QueryError::cursor(format!(
                    "cursor value {} is {}, {} is {}",
                    value,
                    value.kind(),
                    spec.field(),
                    spec.kind()
                )));
            }

            clause.push_str(&format!(
                " AND ({sort} {op} ? OR ({id} {op} ? AND {sort} = ?))"
            ));
            params.extend([value.clone(), reference, value]);
        }
    }

    let direction = order.as_sql();
    if spec.sorts_by_identifier() {
        clause.push_str(&format!(" ORDER BY {id} {direction}"));
    } else {
        clause.push_str(&format!(" ORDER BY {sort} {direction}, {id} {direction}"));
    }

    clause.push_str(" LIMIT ?");
    params.push(Value::Integer(i64::from(limit)));

    Ok(Predicate {
        clause,
        params,
        limit,
        order,
    })
}

/// Case-folded substring pattern with LIKE wildcards escaped.
///
/// Folds ASCII only, the same as SQLite `LOWER`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.to_ascii_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, USERS};
    use chrono::DateTime;

    const SCORES: Collection = Collection {
        table: "score",
        identifier: "userId",
        fields: &[
            Field::integer("score").sortable(),
            Field::text("email").searchable(),
        ],
    };

    fn spec(field: &str, order: SortOrder) -> SortSpec {
        SCORES.sort_spec(Some(field), order).unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn first_page_only_hides_deleted() {
        let p = build(&SCORES, None, &spec("score", SortOrder::Asc), &Cursor::None, 2).unwrap();
        assert_eq!(
            p.clause(),
            "\"deletedAt\" IS NULL ORDER BY \"score\" ASC, \"userId\" ASC LIMIT ?"
        );
        assert_eq!(p.params(), &[Value::Integer(2)]);
        assert_eq!(p.order(), SortOrder::Asc);
    }

    #[test]
    fn identifier_sort_has_no_tiebreak_column() {
        let p = build(&SCORES, None, &spec("userId", SortOrder::Desc), &Cursor::None, 5).unwrap();
        assert_eq!(p.clause(), "\"deletedAt\" IS NULL ORDER BY \"userId\" DESC LIMIT ?");
    }

    #[test]
    fn filter_matches_every_searchable_column() {
        let p = build(
            &SCORES,
            Some("Ann"),
            &spec("userId", SortOrder::Asc),
            &Cursor::None,
            10,
        )
        .unwrap();
        assert_eq!(
            p.clause(),
            "\"deletedAt\" IS NULL AND (LOWER(\"userId\") LIKE ? ESCAPE '\\' \
             OR LOWER(\"email\") LIKE ? ESCAPE '\\') ORDER BY \"userId\" ASC LIMIT ?"
        );
        assert_eq!(p.params(), &[text("%ann%"), text("%ann%"), Value::Integer(10)]);
    }

    #[test]
    fn blank_filter_is_ignored() {
        let p = build(&SCORES, Some("   "), &spec("score", SortOrder::Asc), &Cursor::None, 1)
            .unwrap();
        assert!(!p.clause().contains("LIKE"));
    }

    #[test]
    fn filter_metacharacters_stay_in_parameters() {
        let p = build(
            &SCORES,
            Some("' OR '1'='1"),
            &spec("score", SortOrder::Asc),
            &Cursor::None,
            10,
        )
        .unwrap();
        assert!(!p.clause().contains("'1'"));
        assert_eq!(p.params()[0], text("%' or '1'='1%"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn non_ascii_letters_are_not_folded() {
        assert_eq!(like_pattern("ÄPFEL"), "%Äpfel%");
    }

    #[test]
    fn after_ascending() {
        let cursor = Cursor::after("u2", Some(Value::Integer(20)));
        let p = build(&SCORES, None, &spec("score", SortOrder::Asc), &cursor, 2).unwrap();
        assert_eq!(
            p.clause(),
            "\"deletedAt\" IS NULL AND (\"score\" > ? OR (\"userId\" > ? AND \"score\" = ?)) \
             ORDER BY \"score\" ASC, \"userId\" ASC LIMIT ?"
        );
        assert_eq!(
            p.params(),
            &[Value::Integer(20), text("u2"), Value::Integer(20), Value::Integer(2)]
        );
    }

    #[test]
    fn after_descending() {
        let cursor = Cursor::after("u2", Some(Value::Integer(20)));
        let p = build(&SCORES, None, &spec("score", SortOrder::Desc), &cursor, 2).unwrap();
        assert!(p
            .clause()
            .contains("(\"score\" < ? OR (\"userId\" < ? AND \"score\" = ?))"));
        assert!(p.clause().ends_with("ORDER BY \"score\" DESC, \"userId\" DESC LIMIT ?"));
    }

    #[test]
    fn before_ascending_mirrors_after() {
        let cursor = Cursor::before("u4", Some(Value::Integer(20)));
        let p = build(&SCORES, None, &spec("score", SortOrder::Asc), &cursor, 2).unwrap();
        assert!(p
            .clause()
            .contains("(\"score\" < ? OR (\"userId\" < ? AND \"score\" = ?))"));
        assert!(p.clause().ends_with("ORDER BY \"score\" DESC, \"userId\" DESC LIMIT ?"));
        assert_eq!(p.order(), SortOrder::Desc);
        assert_eq!(p.params()[1], text("u4"));
    }

    #[test]
    fn before_descending_mirrors_after() {
        let cursor = Cursor::before("u4", Some(Value::Integer(20)));
        let p = build(&SCORES, None, &spec("score", SortOrder::Desc), &cursor, 2).unwrap();
        assert!(p
            .clause()
            .contains("(\"score\" > ? OR (\"userId\" > ? AND \"score\" = ?))"));
        assert_eq!(p.order(), SortOrder::Asc);
    }

    #[test]
    fn identifier_cursors_compare_identifier_only() {
        let asc = spec("userId", SortOrder::Asc);
        let desc = spec("userId", SortOrder::Desc);

        let after_asc = build(&SCORES, None, &asc, &Cursor::after("u2", None), 3).unwrap();
        assert!(after_asc.clause().contains("AND \"userId\" > ?"));
        let after_desc = build(&SCORES, None, &desc, &Cursor::after("u2", None), 3).unwrap();
        assert!(after_desc.clause().contains("AND \"userId\" < ?"));

        let before_asc = build(&SCORES, None, &asc, &Cursor::before("u2", None), 3).unwrap();
        assert!(before_asc.clause().contains("AND \"userId\" < ?"));
        assert_eq!(before_asc.params(), &[text("u2"), Value::Integer(3)]);
        let before_desc = build(&SCORES, None, &desc, &Cursor::before("u2", None), 3).unwrap();
        assert!(before_desc.clause().contains("AND \"userId\" > ?"));
        assert_eq!(before_desc.params()[0], text("u2"));
    }

    #[test]
    fn params_follow_placeholder_order() {
        let cursor = Cursor::after("u2", Some(Value::Integer(20)));
        let p = build(&SCORES, Some("x"), &spec("score", SortOrder::Asc), &cursor, 7).unwrap();
        assert_eq!(p.clause().matches('?').count(), p.params().len());
        assert_eq!(
            p.params(),
            &[
                text("%x%"),
                text("%x%"),
                Value::Integer(20),
                text("u2"),
                Value::Integer(20),
                Value::Integer(7),
            ]
        );
    }

    #[test]
    fn cursor_without_value_is_rejected_for_non_identifier_sort() {
        let err = build(
            &SCORES,
            None,
            &spec("score", SortOrder::Asc),
            &Cursor::after("u2", None),
            2,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidCursor { .. }));
    }

    #[test]
    fn cursor_value_of_wrong_kind_is_rejected() {
        let ts = DateTime::from_timestamp_millis(0).unwrap();
        let err = build(
            &SCORES,
            None,
            &spec("score", SortOrder::Asc),
            &Cursor::after("u2", Some(Value::Timestamp(ts))),
            2,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidCursor { .. }));
    }

    #[test]
    fn identifier_sort_ignores_cursor_value() {
        let spec = USERS.sort_spec(None, SortOrder::Asc).unwrap();
        let cursor = Cursor::after("u2", Some(Value::Integer(1)));
        let p = build(&USERS, None, &spec, &cursor, 2).unwrap();
        assert_eq!(p.params(), &[text("u2"), Value::Integer(2)]);
    }
}
