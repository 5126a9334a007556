//! Key/Value Store
//!
//! Flat byte-oriented key/value port the whole tree is persisted into, with a
//! durable sled-backed adapter and an in-memory adapter.

pub mod gateway;
pub mod persistence;

pub use gateway::{LoadedTree, PersistenceGateway, TreeOrigin, SEED_KEY, TREE_KEY};
pub use persistence::SledKeyValueStore;

use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flat key/value store interface
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Make previous writes durable
    fn flush(&self) -> Result<(), StorageError>;
}

#[derive(Default)]
struct MemoryInner {
    entries: HashMap<String, Vec<u8>>,
    writes: HashMap<String, usize>,
}

/// In-memory key/value store.
///
/// Clones share the same entries, so a caller can keep a handle to inspect
/// what a service persisted. Nothing survives the process.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<RwLock<MemoryInner>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls for `key`
    pub fn write_count(&self, key: &str) -> usize {
        self.inner.read().writes.get(key).copied().unwrap_or(0)
    }

    /// When set, every `put` fails as if the backing storage were exhausted.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("store is read-only, cannot write {}", key),
            )));
        }
        let mut inner = self.inner.write();
        inner.entries.insert(key.to_string(), value.to_vec());
        *inner.writes.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.write().entries.remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
