//! simvfs: simulated virtual file system
//!
//! A hierarchical tree of folders and files held in memory, persisted as a
//! whole to a key/value store after every successful mutation. File content is
//! additionally kept in a deterministic, seed-keyed encoded form.

pub mod codec;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod service;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use codec::{ContentCodec, DecodedContent};
pub use concurrency::VfsHandle;
pub use config::{ConfigLoader, VfsConfig};
pub use error::{ApiError, ErrorKind, VfsError};
pub use service::{TreeStats, VfsService, VfsServiceBuilder};
pub use store::{KeyValueStore, MemoryKeyValueStore, PersistenceGateway, SledKeyValueStore};
pub use tree::{FileNode, FolderNode, Node, NodeKind, NodeRef, VfsPath};
