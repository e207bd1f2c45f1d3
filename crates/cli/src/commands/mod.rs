//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod health;
pub mod products;

use std::sync::Arc;

use thiserror::Error;

use vitrine_client::api::ApiError;
use vitrine_client::app::VitrineApp;
use vitrine_client::config::{ClientConfig, ConfigError};
use vitrine_client::storage::{KeyValueStore, MemoryStore, RedbStore, StorageError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The durable store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The API rejected or never received a request.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Anything else worth stopping for.
    #[error("{0}")]
    Other(String),
}

/// Build the app from env config, with durable storage when
/// `VITRINE_STORAGE_PATH` is set.
pub fn build_app() -> Result<VitrineApp, CliError> {
    let config = ClientConfig::from_env()?;

    let storage: Arc<dyn KeyValueStore> = match &config.storage_path {
        Some(path) => Arc::new(RedbStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };

    Ok(VitrineApp::new(config, storage))
}
