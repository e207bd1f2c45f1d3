//! redb-backed durable store.
//!
//! A single-file embedded database with one `kv` table. redb's API is
//! blocking, so every call is pushed onto the blocking thread pool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{KeyValueStore, StorageError};

/// Single table holding every namespaced key.
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// A [`KeyValueStore`] backed by a [`redb`] database file.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file cannot be created or
    /// opened, or the `kv` table cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(|e| StorageError::Open(e.to_string()))?;

        // Create the table up front so first reads don't fail
        let txn = db
            .begin_write()
            .map_err(|e| StorageError::Open(e.to_string()))?;
        txn.open_table(KV_TABLE)
            .map(|_| ())
            .map_err(|e| StorageError::Open(e.to_string()))?;
        txn.commit().map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Read(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl KeyValueStore for RedbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_owned();
        self.run_blocking(move |db| {
            let txn = db
                .begin_read()
                .map_err(|e| StorageError::Read(e.to_string()))?;
            let table = txn
                .open_table(KV_TABLE)
                .map_err(|e| StorageError::Read(e.to_string()))?;
            let value = table
                .get(key.as_str())
                .map_err(|e| StorageError::Read(e.to_string()))?
                .map(|guard| guard.value().to_owned());
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = key.to_owned();
        let value = value.to_owned();
        self.run_blocking(move |db| {
            let txn = db
                .begin_write()
                .map_err(|e| StorageError::Write(e.to_string()))?;
            {
                let mut table = txn
                    .open_table(KV_TABLE)
                    .map_err(|e| StorageError::Write(e.to_string()))?;
                table
                    .insert(key.as_str(), value.as_str())
                    .map_err(|e| StorageError::Write(e.to_string()))?;
            }
            txn.commit().map_err(|e| StorageError::Write(e.to_string()))
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_owned();
        self.run_blocking(move |db| {
            let txn = db
                .begin_write()
                .map_err(|e| StorageError::Write(e.to_string()))?;
            {
                let mut table = txn
                    .open_table(KV_TABLE)
                    .map_err(|e| StorageError::Write(e.to_string()))?;
                table
                    .remove(key.as_str())
                    .map_err(|e| StorageError::Write(e.to_string()))?;
            }
            txn.commit().map_err(|e| StorageError::Write(e.to_string()))
        })
        .await
    }
}
