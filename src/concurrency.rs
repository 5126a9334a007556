//! Shared access to one VFS
//!
//! Every operation rewrites or reads the whole tree, and a rename touches an
//! unbounded subtree, so the whole facade sits behind a single mutex. Each call
//! through a [`VfsHandle`] holds that lock for its full resolve, mutate and
//! persist cycle; other callers see the tree before or after, never between.

use crate::codec::DecodedContent;
use crate::error::VfsError;
use crate::service::{TreeStats, VfsService};
use crate::tree::{Node, ValidationReport};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a [`VfsService`] shared between threads
#[derive(Clone)]
pub struct VfsHandle {
    inner: Arc<Mutex<VfsService>>,
}

impl VfsHandle {
    pub fn new(service: VfsService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    /// Run `f` with exclusive access, for multi-step work that must not interleave.
    pub fn with<R>(&self, f: impl FnOnce(&mut VfsService) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Owned copy of the node at `path`
    pub fn get_item(&self, path: &str) -> Option<Node> {
        self.inner.lock().get_item(path).map(|node| node.to_node())
    }

    /// Owned copies of the direct children of `path`
    pub fn list_path(&self, path: &str) -> Vec<Node> {
        self.inner
            .lock()
            .list_path(path)
            .into_iter()
            .map(|node| node.to_node())
            .collect()
    }

    pub fn read_file(&self, path: &str) -> Result<String, VfsError> {
        self.inner.lock().read_file(path).map(str::to_string)
    }

    pub fn decode_file(&self, path: &str) -> Result<DecodedContent, VfsError> {
        self.inner.lock().decode_file(path)
    }

    pub fn create_file(
        &self,
        folder_path: &str,
        name: &str,
        content: &str,
    ) -> Result<String, VfsError> {
        self.inner.lock().create_file(folder_path, name, content)
    }

    pub fn create_folder(&self, path: &str, name: &str) -> Result<String, VfsError> {
        self.inner.lock().create_folder(path, name)
    }

    pub fn delete_item(&self, path: &str) -> Result<String, VfsError> {
        self.inner.lock().delete_item(path)
    }

    pub fn update_file_content(&self, path: &str, new_content: &str) -> Result<String, VfsError> {
        self.inner.lock().update_file_content(path, new_content)
    }

    pub fn rename_item(&self, path: &str, new_name: &str) -> Result<String, VfsError> {
        self.inner.lock().rename_item(path, new_name)
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.lock().stats()
    }

    pub fn validate(&self) -> ValidationReport {
        self.inner.lock().validate()
    }
}
