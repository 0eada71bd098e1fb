//! Store factory - Creates the key-value backend selected by configuration

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::application::ports::outbound::{KeyValueStorePort, PersistenceError};
use crate::infrastructure::config::QueueConfig;
use crate::infrastructure::persistence::{InMemoryKeyValueStore, SqliteKeyValueStore};

/// Enum wrapper for key-value backends to enable runtime selection
pub enum KeyValueBackend {
    Memory(InMemoryKeyValueStore),
    Sqlite(SqliteKeyValueStore),
}

#[async_trait]
impl KeyValueStorePort for KeyValueBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match self {
            KeyValueBackend::Memory(s) => s.get(key).await,
            KeyValueBackend::Sqlite(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        match self {
            KeyValueBackend::Memory(s) => s.set(key, value).await,
            KeyValueBackend::Sqlite(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match self {
            KeyValueBackend::Memory(s) => s.remove(key).await,
            KeyValueBackend::Sqlite(s) => s.remove(key).await,
        }
    }
}

/// Factory for the key-value store backing the offline queue
pub struct StoreFactory {
    config: QueueConfig,
}

impl StoreFactory {
    pub fn new(config: QueueConfig) -> Self {
        Self { config }
    }

    /// Create the configured backend
    pub async fn create_store(&self) -> Result<Arc<KeyValueBackend>> {
        match self.config.backend.as_str() {
            "memory" => {
                tracing::warn!("Using in-memory queue store; queued operations will not survive a restart");
                Ok(Arc::new(KeyValueBackend::Memory(InMemoryKeyValueStore::new())))
            }
            "sqlite" => {
                // Ensure data directory exists
                if let Some(parent) = std::path::Path::new(&self.config.sqlite_path).parent() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create queue database directory")?;
                }

                let options = SqliteConnectOptions::from_str(&format!(
                    "sqlite:{}",
                    self.config.sqlite_path
                ))
                .context("Invalid SQLite queue database path")?
                .create_if_missing(true);

                let pool = SqlitePoolOptions::new()
                    .connect_with(options)
                    .await
                    .context("Failed to connect to SQLite queue database")?;
                tracing::info!("Connected to SQLite queue database: {}", self.config.sqlite_path);

                let store = SqliteKeyValueStore::new(pool)
                    .await
                    .context("Failed to initialize key-value table")?;
                Ok(Arc::new(KeyValueBackend::Sqlite(store)))
            }
            backend => anyhow::bail!("Unsupported queue backend: {}", backend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str, sqlite_path: &str) -> QueueConfig {
        QueueConfig {
            backend: backend.to_string(),
            sqlite_path: sqlite_path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let factory = StoreFactory::new(config("memory", ""));
        let store = factory.create_store().await.unwrap();
        assert!(matches!(*store, KeyValueBackend::Memory(_)));

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_sqlite_backend_creates_database_file() {
        let path = std::env::temp_dir()
            .join(format!("ticket-sync-{}", uuid::Uuid::new_v4()))
            .join("queue.db");
        let factory = StoreFactory::new(config("sqlite", &path.to_string_lossy()));

        let store = factory.create_store().await.unwrap();
        store.set("k", "v").await.unwrap();

        assert!(path.exists());
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        let factory = StoreFactory::new(config("redis", ""));
        assert!(factory.create_store().await.is_err());
    }
}
