//! list-server binary entry point.
//!
//! Usage:
//! ```bash
//! list-server --config list-server.toml
//! ```

use anyhow::Context;
use keyset_list_server::config::Config;
use keyset_list_server::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "list-server.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = load_config()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting list-server");

    server::run(config).await.context("list-server failed")
}

fn load_config() -> anyhow::Result<Config> {
    let (path, explicit) = get_config_path();

    if !explicit && !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    Config::from_file(&path).with_context(|| format!("loading {}", path.display()))
}

fn get_config_path() -> (PathBuf, bool) {
    match std::env::args().skip_while(|arg| arg != "--config").nth(1) {
        Some(path) => (PathBuf::from(path), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    }
}
