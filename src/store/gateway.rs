//! Persistence Gateway
//!
//! Serializes the whole tree to one JSON blob under [`TREE_KEY`] and keeps the
//! codec seed under [`SEED_KEY`]. Loading falls back to the bootstrap tree when
//! nothing is stored or the stored value fails structural validation.

use super::KeyValueStore;
use crate::codec::{generate_seed, ContentCodec};
use crate::error::{StorageError, VfsError};
use crate::tree::{bootstrap_tree, validate_tree, FolderNode, Node};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Key of the serialized tree
pub const TREE_KEY: &str = "vfs.tree";

/// Key of the codec seed
pub const SEED_KEY: &str = "vfs.seed";

/// Where a loaded tree came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOrigin {
    /// Read back as stored
    Stored,
    /// Read back, then re-encoded because its content was encoded under another seed
    Reencoded { files: usize },
    /// Nothing was stored; bootstrap layout
    Bootstrap,
    /// Stored value was corrupted and replaced by the bootstrap layout
    Recovered { reason: String },
}

#[derive(Debug)]
pub struct LoadedTree {
    pub root: FolderNode,
    pub origin: TreeOrigin,
}

/// Borrowed root, tagged the same way as a stored [`Node`]
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredRoot<'a> {
    Folder(&'a FolderNode),
}

/// Whole-tree persistence over a [`KeyValueStore`]
pub struct PersistenceGateway {
    kv: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(kv: impl KeyValueStore + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    /// Load the tree, or the bootstrap layout if nothing valid is stored.
    ///
    /// Corruption is logged, not returned; only storage failures are errors.
    pub fn load(&self, codec: &ContentCodec) -> Result<LoadedTree, VfsError> {
        let bytes = match self.kv.get(TREE_KEY)? {
            Some(bytes) => bytes,
            None => {
                info!("No stored tree, starting from bootstrap layout");
                return Ok(LoadedTree {
                    root: bootstrap_tree(codec)?,
                    origin: TreeOrigin::Bootstrap,
                });
            }
        };

        let mut root = match decode_tree(&bytes) {
            Ok(root) => root,
            Err(reason) => {
                warn!(reason = %reason, "Stored tree is corrupted, replacing with bootstrap layout");
                return Ok(LoadedTree {
                    root: bootstrap_tree(codec)?,
                    origin: TreeOrigin::Recovered { reason },
                });
            }
        };

        let files = reencode_stale(&mut root, codec);
        if files > 0 {
            warn!(
                files,
                seed = %codec.fingerprint(),
                "Stored content was encoded under a different seed, re-encoded"
            );
            return Ok(LoadedTree {
                root,
                origin: TreeOrigin::Reencoded { files },
            });
        }

        debug!(bytes = bytes.len(), "Loaded stored tree");
        Ok(LoadedTree {
            root,
            origin: TreeOrigin::Stored,
        })
    }

    /// Overwrite the stored tree with `root` and flush.
    pub fn save(&self, root: &FolderNode) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&StoredRoot::Folder(root))?;
        self.kv.put(TREE_KEY, &bytes)?;
        self.kv.flush()?;
        debug!(bytes = bytes.len(), "Saved tree");
        Ok(())
    }

    pub fn load_seed(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .kv
            .get(SEED_KEY)?
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|seed| !seed.is_empty()))
    }

    pub fn save_seed(&self, seed: &str) -> Result<(), StorageError> {
        self.kv.put(SEED_KEY, seed.as_bytes())?;
        self.kv.flush()
    }

    /// Seed for this process: `configured` if given, else the stored one, else a
    /// freshly generated seed. Whatever is chosen is persisted.
    pub fn resolve_seed(&self, configured: Option<&str>) -> Result<String, StorageError> {
        let stored = self.load_seed()?;
        let seed = match (configured, stored) {
            (Some(configured), stored) => {
                if stored.as_deref() != Some(configured) {
                    self.save_seed(configured)?;
                }
                configured.to_string()
            }
            (None, Some(stored)) => stored,
            (None, None) => {
                let seed = generate_seed();
                self.save_seed(&seed)?;
                info!("Generated new content codec seed");
                seed
            }
        };
        Ok(seed)
    }
}

fn decode_tree(bytes: &[u8]) -> Result<FolderNode, String> {
    let node: Node = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let root = match node {
        Node::Folder(root) => root,
        Node::File(_) => return Err("stored root is a file".to_string()),
    };

    let report = validate_tree(&root, None);
    if !report.is_valid() {
        return Err(report.errors.join("; "));
    }
    Ok(root)
}

fn reencode_stale(folder: &mut FolderNode, codec: &ContentCodec) -> usize {
    let mut count = 0;
    for child in folder.children_mut() {
        match child {
            Node::Folder(sub) => count += reencode_stale(sub, codec),
            Node::File(file) => {
                if !codec.verify(file.content(), file.encoded_content()) {
                    file.reencode(codec);
                    count += 1;
                }
            }
        }
    }
    count
}
