//! Server startup.
//!
//! Opens storage, makes sure every listed collection exists, and serves the
//! HTTP router until Ctrl-C.

use crate::config::Config;
use crate::error::ServerError;
use crate::http;
use crate::service::ListService;
use crate::storage::SqliteStorage;
use list_core::{Collection, FEATURES, USERS};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Collections served over HTTP.
pub const COLLECTIONS: [&Collection; 2] = [&USERS, &FEATURES];

/// Open storage and build the list service for a configuration.
pub async fn open(config: &Config) -> Result<ListService<SqliteStorage>, ServerError> {
    config.validate()?;

    let storage =
        SqliteStorage::new(&config.storage.database, config.storage.max_connections).await?;
    for collection in COLLECTIONS {
        storage.ensure_collection(collection).await?;
    }

    tracing::info!(
        database = %config.storage.database.display(),
        collections = COLLECTIONS.len(),
        "Storage ready"
    );

    Ok(ListService::new(storage, config.list.policy()))
}

/// Run the server until Ctrl-C.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let service = Arc::new(open(&config).await?);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %config.server.bind_address,
        default_limit = config.list.default_limit,
        max_limit = config.list.max_limit,
        "HTTP server listening"
    );

    axum::serve(listener, http::build_router(service.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.executor().close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        // No handler: serve until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use list_types::ListQuery;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.database = dir.path().join("list.db");
        config.list.default_limit = 3;
        config
    }

    #[tokio::test]
    async fn open_creates_collections() {
        let dir = TempDir::new().unwrap();
        let service = open(&config_in(&dir)).await.unwrap();

        for collection in COLLECTIONS {
            let page = service
                .list_query(collection, &ListQuery::default())
                .await
                .unwrap();
            assert!(page.records.is_empty());
        }
        assert_eq!(service.limits().default_limit, 3);
    }

    #[tokio::test]
    async fn open_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.list.max_limit = 0;

        let err = open(&config).await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
