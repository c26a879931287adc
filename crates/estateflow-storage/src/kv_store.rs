// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the KeyValueStore seam.

use async_trait::async_trait;
use estateflow_core::{EstateError, KeyValueStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed key-value store.
///
/// Wraps a [`Database`] handle; all operations delegate to the typed
/// `kv` query module.
#[derive(Clone)]
pub struct SqliteKvStore {
    db: Database,
}

impl SqliteKvStore {
    /// Create a store over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, EstateError> {
        queries::kv::get(&self.db, key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), EstateError> {
        queries::kv::set(&self.db, key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), EstateError> {
        queries::kv::delete(&self.db, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn implements_the_kv_seam() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seam_test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        let store: Box<dyn KeyValueStore> = Box::new(SqliteKvStore::new(db));

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
