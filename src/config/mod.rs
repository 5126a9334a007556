//! Configuration
//!
//! `VfsConfig` is assembled by [`ConfigLoader`] from defaults, the global config
//! file, an optional explicit file and `SIMVFS__*` environment variables.

pub mod loader;
pub mod paths;

pub use loader::ConfigLoader;

use crate::codec::DEFAULT_PREVIEW_CHARS;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::{MemoryKeyValueStore, PersistenceGateway, SledKeyValueStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VfsConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key/value store backs the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    /// Nothing survives the process
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// sled database directory; `None` means the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the sled directory.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => paths::default_store_path(),
        }
    }

    /// Open the configured key/value store and wrap it in a gateway.
    pub fn open_gateway(&self) -> Result<PersistenceGateway, ApiError> {
        match self.backend {
            StorageBackend::Sled => {
                let path = self.resolve_path()?;
                tracing::debug!(path = %path.display(), "Opening sled store");
                Ok(PersistenceGateway::new(SledKeyValueStore::open(&path)?))
            }
            StorageBackend::Memory => Ok(PersistenceGateway::new(MemoryKeyValueStore::new())),
        }
    }
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

/// Content codec configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Fixed seed; when unset the stored seed is used or one is generated
    #[serde(default)]
    pub seed: Option<String>,

    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            seed: None,
            preview_chars: default_preview_chars(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(seed) = &self.seed {
            if seed.trim().is_empty() {
                return Err(ApiError::ConfigError(
                    "codec.seed cannot be empty if provided".to_string(),
                ));
            }
        }
        Ok(())
    }
}
