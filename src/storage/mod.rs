//! # Persistence Collaborator
//!
//! The ordering core treats storage as a plain key-value store holding four
//! independently keyed blobs, one per collection. Each blob is a whole
//! collection serialized as a JSON array; there are no partial updates and no
//! schema versions.
//!
//! - [`KeyValueStore`]: the async contract (`get` / `set`).
//! - [`MemoryStore`]: shared in-process implementation.
//! - [`mock::MockStore`]: scripted double for failure injection in tests.
//!
//! Several systems may share one store (e.g. a customer session and a staff
//! session over the same `Arc<MemoryStore>`). Writers replace whole
//! collections, so concurrent writers follow last-write-wins.

mod memory;
pub mod mock;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Key of the tables collection.
pub const TABLES_KEY: &str = "cafe.tables";
/// Key of the menu items collection.
pub const MENU_ITEMS_KEY: &str = "cafe.menu_items";
/// Key of the orders collection.
pub const ORDERS_KEY: &str = "cafe.orders";
/// Key of the notifications collection.
pub const NOTIFICATIONS_KEY: &str = "cafe.notifications";

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage backend failed: {0}")]
    Backend(String),

    /// A stored snapshot could not be decoded.
    #[error("snapshot under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode snapshot for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asynchronous key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Load a whole collection. A missing key yields `None`.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Write a whole collection.
pub async fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Table, TableId};

    #[tokio::test]
    async fn test_collection_round_trip() {
        let store = MemoryStore::new();
        let tables = vec![Table::new(TableId(1), 1), Table::new(TableId(2), 2)];

        save_collection(&store, TABLES_KEY, &tables).await.unwrap();
        let loaded: Option<Vec<Table>> = load_collection(&store, TABLES_KEY).await.unwrap();
        assert_eq!(loaded, Some(tables));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<Table>> = load_collection(&store, TABLES_KEY).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_garbage_is_reported_as_corrupt() {
        let store = MemoryStore::new();
        store.set(ORDERS_KEY, "{not json".to_string()).await.unwrap();

        let result = load_collection::<Table>(&store, ORDERS_KEY).await;
        match result {
            Err(StorageError::Corrupt { key, .. }) => assert_eq!(key, ORDERS_KEY),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }
}
