//! Structural mutation primitives
//!
//! Insert, remove and rename operate on an already-resolved parent folder and
//! keep the structural invariants: unique child names, valid names, and every
//! path equal to its parent path plus its name. Policy (protected paths) is the
//! caller's concern.

use crate::error::VfsError;
use crate::tree::node::{FolderNode, Node};
use crate::tree::path::{join_path, validate_name};
use crate::types::NodeId;

impl Node {
    /// Point this node at a new parent and rewrite `path` for it and every descendant.
    pub(crate) fn attach_to(&mut self, parent_id: NodeId, parent_path: &str) {
        let meta = self.meta_mut();
        meta.parent_id = Some(parent_id);
        meta.path = join_path(parent_path, &meta.name);

        if let Node::Folder(folder) = self {
            let id = folder.meta.id;
            let path = folder.meta.path.clone();
            for child in folder.children_mut() {
                child.attach_to(id, &path);
            }
        }
    }
}

impl FolderNode {
    /// Insert `node` under `name`.
    ///
    /// Sets the child's name, `parent_id` and path (recursively for a folder) and
    /// stamps this folder's `modified_at`.
    pub fn insert_child(&mut self, name: &str, mut node: Node) -> Result<&Node, VfsError> {
        validate_name(name)?;
        if self.contains(name) {
            return Err(VfsError::AlreadyExists(join_path(&self.meta.path, name)));
        }

        node.meta_mut().name = name.to_string();
        node.attach_to(self.meta.id, &self.meta.path);
        self.meta.touch();

        let child = self.children.entry(name.to_string()).or_insert(node);
        Ok(child)
    }

    /// Detach and return the child named `name` with its whole subtree.
    pub fn remove_child(&mut self, name: &str) -> Result<Node, VfsError> {
        let removed = self
            .children
            .remove(name)
            .ok_or_else(|| VfsError::NotFound(join_path(&self.meta.path, name)))?;
        self.meta.touch();
        Ok(removed)
    }

    /// Rename a child in place, carrying its subtree along.
    ///
    /// Renaming to the current name leaves the tree unchanged apart from timestamps.
    pub fn rename_child(&mut self, old_name: &str, new_name: &str) -> Result<&Node, VfsError> {
        validate_name(new_name)?;
        if !self.contains(old_name) {
            return Err(VfsError::NotFound(join_path(&self.meta.path, old_name)));
        }
        if old_name != new_name && self.contains(new_name) {
            return Err(VfsError::AlreadyExists(join_path(
                &self.meta.path,
                new_name,
            )));
        }

        let mut node = self.remove_child(old_name)?;
        node.meta_mut().touch();
        self.insert_child(new_name, node)
    }
}
