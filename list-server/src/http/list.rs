//! List endpoints.
//!
//! Decodes query parameters into a [`ListQuery`], runs it through the
//! [`ListService`], and renders the page as a JSON array with cursor tokens
//! for the neighbouring pages in `x-next-cursor` / `x-prev-cursor`.

use crate::error::ListError;
use crate::record::ResourceRecord;
use crate::service::{ListService, Page};
use crate::storage::SqliteStorage;
use axum::extract::Query;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use list_core::schema::{CREATED_AT, UPDATED_AT};
use list_core::{Collection, SortSpec, FEATURES, USERS};
use list_types::{CursorToken, ListQuery, SortOrder, TypeError, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Header carrying the token for the page after this one.
pub const NEXT_CURSOR: &str = "x-next-cursor";
/// Header carrying the token for the page before this one.
pub const PREV_CURSOR: &str = "x-prev-cursor";

/// Raw list query parameters. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Free-text filter.
    pub q: Option<String>,
    /// Sort field.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Reference id to page after.
    pub after_id: Option<String>,
    /// Sort value to page after.
    pub after_value: Option<String>,
    /// Reference id to page before.
    pub before_id: Option<String>,
    /// Sort value to page before.
    pub before_value: Option<String>,
    /// Opaque token to page after.
    pub after: Option<String>,
    /// Opaque token to page before.
    pub before: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

impl ListParams {
    /// Convert into a list request.
    ///
    /// An unparsable `limit` is ignored (the default applies). A token may not
    /// be combined with explicit fields for the same direction.
    pub fn into_query(self) -> Result<ListQuery, ApiError> {
        let sort_order = match present(self.sort_order) {
            Some(raw) => raw.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };

        let (after_id, after_value) = merge_token(
            "after",
            present(self.after),
            present(self.after_id),
            present(self.after_value),
        )?;
        let (before_id, before_value) = merge_token(
            "before",
            present(self.before),
            present(self.before_id),
            present(self.before_value),
        )?;

        Ok(ListQuery {
            query: present(self.q),
            sort_by: present(self.sort_by),
            sort_order,
            limit: present(self.limit).and_then(|raw| parse_limit(&raw)),
            after_id,
            after_value,
            before_id,
            before_value,
        })
    }
}

/// Parse a requested page size. Integers outside the `i64` range saturate so
/// they still clamp; anything non-numeric is `None`.
fn parse_limit(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

type Fields = (Option<String>, Option<String>);

fn merge_token(
    direction: &str,
    token: Option<String>,
    id: Option<String>,
    value: Option<String>,
) -> Result<Fields, ApiError> {
    let Some(token) = token else {
        return Ok((id, value));
    };

    if id.is_some() || value.is_some() {
        return Err(ApiError::invalid_cursor(format!(
            "{direction} token cannot be combined with {direction}Id/{direction}Value"
        )));
    }

    let token = CursorToken::decode(&token)?;
    Ok((Some(token.id), token.value))
}

/// Error body returned by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

/// A list request failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_cursor", message)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::InvalidSortField { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_sort_field", err.to_string())
            }
            ListError::InvalidCursor { .. } => Self::invalid_cursor(err.to_string()),
            ListError::Storage(ref e) => {
                tracing::warn!(error = %e, "List query failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "storage backend failure",
                )
            }
        }
    }
}

impl From<TypeError> for ApiError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidSortOrder(_) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_sort_order", err.to_string())
            }
            TypeError::InvalidToken(_) | TypeError::Coercion { .. } => {
                Self::invalid_cursor(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_client_error() {
            tracing::debug!(
                code = %self.body.code,
                message = %self.body.message,
                "Rejected list request"
            );
        }
        (self.status, Json(self.body)).into_response()
    }
}

/// `GET /v1/users`
pub async fn list_users(
    Extension(service): Extension<Arc<ListService<SqliteStorage>>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    list_page(&service, &USERS, params).await
}

/// `GET /v1/features`
pub async fn list_features(
    Extension(service): Extension<Arc<ListService<SqliteStorage>>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    list_page(&service, &FEATURES, params).await
}

async fn list_page(
    service: &ListService<SqliteStorage>,
    collection: &Collection,
    params: ListParams,
) -> Result<Response, ApiError> {
    let query = params.into_query()?;
    let Page {
        spec,
        backward,
        mut records,
    } = service.list_query(collection, &query).await?;

    // Backward pages arrive nearest-the-cursor first.
    if backward {
        records.reverse();
    }

    let body: Vec<serde_json::Value> = records
        .iter()
        .map(|record| record_json(collection, record))
        .collect();
    let mut response = Json(body).into_response();

    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        let headers = response.headers_mut();
        for (name, record) in [(NEXT_CURSOR, last), (PREV_CURSOR, first)] {
            if let Ok(value) = HeaderValue::from_str(&token(&spec, record)) {
                headers.insert(name, value);
            }
        }
    }

    Ok(response)
}

fn token(spec: &SortSpec, record: &ResourceRecord) -> String {
    record.position(spec).token().encode()
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(v) => serde_json::Value::from(*v),
        Value::Text(_) | Value::Timestamp(_) => serde_json::Value::from(value.raw()),
    }
}

/// Render a record as a JSON object keyed by column name.
pub fn record_json(collection: &Collection, record: &ResourceRecord) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    object.insert(
        collection.identifier.to_string(),
        serde_json::Value::from(record.public_id.clone()),
    );
    for (name, value) in &record.attributes {
        object.insert(name.clone(), json_value(value));
    }
    object.insert(
        CREATED_AT.to_string(),
        json_value(&Value::Timestamp(record.created_at)),
    );
    object.insert(
        UPDATED_AT.to_string(),
        json_value(&Value::Timestamp(record.updated_at)),
    );
    serde_json::Value::Object(object)
}
