//! Sled-backed key/value store.

use super::KeyValueStore;
use crate::error::StorageError;
use std::path::Path;

/// Durable key/value store on a sled database
pub struct SledKeyValueStore {
    db: sled::Db,
}

impl SledKeyValueStore {
    /// Open (creating if needed) the database directory at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SledKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key.as_bytes())?.map(|value| value.to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
