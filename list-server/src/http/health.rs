//! Health check endpoint.
//!
//! Reports the page size policy and the listed collections with the `sortBy`
//! values each accepts.

use crate::server::COLLECTIONS;
use crate::service::ListService;
use crate::storage::SqliteStorage;
use axum::{Extension, Json};
use list_core::schema::{CREATED_AT, UPDATED_AT};
use list_core::{Collection, LimitPolicy};
use serde::Serialize;
use std::sync::Arc;

/// A collection as reported by the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    /// Table name.
    pub table: &'static str,
    /// Public identifier column.
    pub identifier: &'static str,
    /// Every accepted `sortBy` value.
    pub sortable: Vec<&'static str>,
}

impl CollectionInfo {
    /// Describe a collection.
    pub fn of(collection: &Collection) -> Self {
        let attributes = collection
            .fields
            .iter()
            .filter(|field| field.sortable)
            .map(|field| field.name);
        Self {
            table: collection.table,
            identifier: collection.identifier,
            sortable: [collection.identifier, CREATED_AT, UPDATED_AT]
                .into_iter()
                .chain(attributes)
                .collect(),
        }
    }
}

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall status.
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
    /// Page size used when a request has none.
    pub default_limit: u32,
    /// Page size cap in effect.
    pub max_limit: u32,
    /// Collections served.
    pub collections: Vec<CollectionInfo>,
}

impl HealthStatus {
    /// Status for a page size policy.
    pub fn new(limits: LimitPolicy) -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            default_limit: limits.default_limit,
            max_limit: limits.max_limit,
            collections: COLLECTIONS.into_iter().map(CollectionInfo::of).collect(),
        }
    }
}

/// Health check handler.
pub async fn health_handler(
    Extension(service): Extension<Arc<ListService<SqliteStorage>>>,
) -> Json<HealthStatus> {
    Json(HealthStatus::new(service.limits()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use list_core::FEATURES;

    #[test]
    fn sortable_fields_start_with_identifier() {
        let info = CollectionInfo::of(&FEATURES);

        assert_eq!(info.table, "feature");
        assert_eq!(
            info.sortable,
            vec!["featureId", "createdAt", "updatedAt", "name"]
        );
    }

    #[test]
    fn every_reported_sort_field_is_accepted() {
        for collection in COLLECTIONS {
            for field in CollectionInfo::of(collection).sortable {
                assert!(collection.sortable(field).is_some(), "{field}");
            }
        }
    }

    #[test]
    fn health_status_serializes() {
        let status = HealthStatus::new(LimitPolicy::new(10, 50));

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["default_limit"], 10);
        assert_eq!(json["max_limit"], 50);
        assert_eq!(json["collections"][0]["table"], "user");
        assert_eq!(json["collections"][1]["identifier"], "featureId");
    }
}
