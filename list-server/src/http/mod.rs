//! HTTP endpoints for list-server.
//!
//! Provides the collection list endpoints and a health check.

pub mod health;
pub mod list;

use crate::service::ListService;
use crate::storage::SqliteStorage;
use axum::{routing::get, Extension, Router};
use std::sync::Arc;

pub use health::{CollectionInfo, HealthStatus};
pub use list::{ApiError, ErrorBody, ListParams};

/// Build the HTTP router with all endpoints.
pub fn build_router(service: Arc<ListService<SqliteStorage>>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/v1/users", get(list::list_users))
        .route("/v1/features", get(list::list_features))
        .layer(Extension(service))
}
