//! Error types
//!
//! `VfsError` is the taxonomy every tree operation reports. `StorageError` and
//! `CodecError` cover the persistence and encoding layers, and `ApiError` is the
//! application-level error used by configuration, logging and the CLI.

use thiserror::Error;

/// Discriminant of a [`VfsError`], for callers that match on failure kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NotAFolder,
    NotAFile,
    AlreadyExists,
    InvalidName,
    Protected,
    Corrupted,
    Storage,
}

/// Failure of a VFS operation
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("No such file or folder: {0}")]
    NotFound(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Protected path cannot be modified: {0}")]
    Protected(String),

    #[error("Corrupted file system state: {0}")]
    Corrupted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl VfsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VfsError::NotFound(_) => ErrorKind::NotFound,
            VfsError::NotAFolder(_) => ErrorKind::NotAFolder,
            VfsError::NotAFile(_) => ErrorKind::NotAFile,
            VfsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            VfsError::InvalidName(_) => ErrorKind::InvalidName,
            VfsError::Protected(_) => ErrorKind::Protected,
            VfsError::Corrupted(_) => ErrorKind::Corrupted,
            VfsError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Failure of the durable key/value layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure to interpret an encoded content string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed encoded content: {0}")]
    Malformed(String),
}

/// Application-level error for configuration, logging and CLI plumbing
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    CodecError(#[from] CodecError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
