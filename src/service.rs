//! VFS Service
//!
//! The facade every caller goes through. Each operation resolves its path,
//! mutates the tree in place, and persists the whole tree once before
//! reporting success. A failed precondition never reaches persistence; a
//! failed save undoes the in-memory mutation so memory and durable state agree.

use crate::codec::{ContentCodec, DecodedContent, DEFAULT_PREVIEW_CHARS};
use crate::error::VfsError;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::store::{PersistenceGateway, TreeOrigin};
use crate::tree::{
    is_protected, resolve, resolve_folder_mut, validate_tree, FileNode, FolderNode, Node,
    NodeRef, Resolution, ValidationReport, VfsPath,
};
use crate::types::Timestamp;
use serde::Serialize;
use tracing::{debug, error, info};

/// Aggregate counts over the live tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: usize,
    /// Sum of file `size`
    pub content_bytes: u64,
    /// Sum of encoded content lengths
    pub encoded_bytes: u64,
}

/// A completed in-memory mutation and how to take it back
struct Change {
    path: String,
    undo: Undo,
}

enum Undo {
    /// Undo a create
    Remove {
        parent: VfsPath,
        name: String,
        parent_stamp: Timestamp,
    },
    /// Undo a delete
    Restore {
        parent: VfsPath,
        node: Node,
        parent_stamp: Timestamp,
    },
    /// Undo a content update
    Content {
        parent: VfsPath,
        name: String,
        content: String,
        stamp: Timestamp,
    },
    /// Undo a rename
    Rename {
        parent: VfsPath,
        from: String,
        to: String,
        parent_stamp: Timestamp,
        stamp: Timestamp,
    },
}

/// Builder for [`VfsService`]
pub struct VfsServiceBuilder {
    gateway: PersistenceGateway,
    seed: Option<String>,
    preview_chars: usize,
    notifier: Box<dyn Notifier>,
}

impl VfsServiceBuilder {
    /// Pin the codec seed instead of using the stored or a generated one.
    pub fn seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Resolve the seed and load the tree.
    pub fn open(self) -> Result<VfsService, VfsError> {
        let seed = self.gateway.resolve_seed(self.seed.as_deref())?;
        let codec = ContentCodec::new(seed).with_preview_chars(self.preview_chars);
        let loaded = self.gateway.load(&codec)?;
        info!(origin = ?loaded.origin, seed = %codec.fingerprint(), "Opened virtual file system");

        Ok(VfsService {
            root: loaded.root,
            codec,
            gateway: self.gateway,
            notifier: self.notifier,
            origin: loaded.origin,
        })
    }
}

/// Virtual file system facade
pub struct VfsService {
    root: FolderNode,
    codec: ContentCodec,
    gateway: PersistenceGateway,
    notifier: Box<dyn Notifier>,
    origin: TreeOrigin,
}

impl VfsService {
    pub fn builder(gateway: PersistenceGateway) -> VfsServiceBuilder {
        VfsServiceBuilder {
            gateway,
            seed: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            notifier: Box::new(TracingNotifier),
        }
    }

    /// Open with default codec settings and tracing notifications.
    pub fn open(gateway: PersistenceGateway) -> Result<Self, VfsError> {
        Self::builder(gateway).open()
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn codec(&self) -> &ContentCodec {
        &self.codec
    }

    /// Where the tree came from when the service was opened
    pub fn origin(&self) -> &TreeOrigin {
        &self.origin
    }

    // ---- queries ----

    /// Node at `path`, or `None` if nothing is there.
    pub fn get_item(&self, path: &str) -> Option<NodeRef<'_>> {
        match resolve(&self.root, &VfsPath::parse(path)) {
            Resolution::Root(root) => Some(NodeRef::Folder(root)),
            Resolution::Found { node, .. } => Some(NodeRef::from(node)),
            _ => None,
        }
    }

    /// Direct children of the folder at `path`, ordered by name.
    ///
    /// Empty when `path` is absent or not a folder.
    pub fn list_path(&self, path: &str) -> Vec<NodeRef<'_>> {
        resolve(&self.root, &VfsPath::parse(path))
            .folder()
            .map(|folder| folder.children().map(NodeRef::from).collect())
            .unwrap_or_default()
    }

    /// Pre-order walk of the subtree at `path`, starting with the node itself.
    pub fn walk(&self, path: &str) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        if let Some(start) = self.get_item(path) {
            push_subtree(start, &mut out);
        }
        out
    }

    pub fn read_file(&self, path: &str) -> Result<&str, VfsError> {
        self.file(path).map(FileNode::content)
    }

    /// Display summary of the file's encoded form
    pub fn decode_file(&self, path: &str) -> Result<DecodedContent, VfsError> {
        let file = self.file(path)?;
        ContentCodec::decode(file.encoded_content()).map_err(|e| {
            VfsError::Corrupted(format!("{}: {}", file.meta.path, e))
        })
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for node in self.walk("/") {
            match node {
                NodeRef::Folder(_) => stats.folders += 1,
                NodeRef::File(file) => {
                    stats.files += 1;
                    stats.content_bytes += file.size();
                    stats.encoded_bytes += file.encoded_content().len() as u64;
                }
            }
        }
        stats
    }

    pub fn validate(&self) -> ValidationReport {
        validate_tree(&self.root, Some(&self.codec))
    }

    /// Like [`validate`](Self::validate) but reports broken invariants as `Corrupted`.
    pub fn validate_strict(&self) -> Result<ValidationReport, VfsError> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(VfsError::Corrupted(report.errors.join("; ")));
        }
        Ok(report)
    }

    fn file(&self, path: &str) -> Result<&FileNode, VfsError> {
        let parsed = VfsPath::parse(path);
        match self.get_item(path) {
            Some(NodeRef::File(file)) => Ok(file),
            Some(NodeRef::Folder(_)) => Err(VfsError::NotAFile(parsed.to_string())),
            None => Err(VfsError::NotFound(parsed.to_string())),
        }
    }

    // ---- mutations ----

    /// Create a file named `name` in the folder at `folder_path`.
    pub fn create_file(
        &mut self,
        folder_path: &str,
        name: &str,
        content: &str,
    ) -> Result<String, VfsError> {
        let node = Node::File(FileNode::new(name, content, &self.codec));
        let change = self.insert(folder_path, name, node);
        self.finish("create_file", change, |path| format!("Created file {}", path))
    }

    /// Create an empty folder named `name` in the folder at `path`.
    pub fn create_folder(&mut self, path: &str, name: &str) -> Result<String, VfsError> {
        let change = self.insert(path, name, Node::Folder(FolderNode::new(name)));
        self.finish("create_folder", change, |path| {
            format!("Created folder {}", path)
        })
    }

    /// Delete the node at `path`.
    ///
    /// Deleting a folder drops its entire subtree. There is no recycle bin; the
    /// removal cannot be undone once persisted.
    pub fn delete_item(&mut self, path: &str) -> Result<String, VfsError> {
        let change = self.remove(path);
        self.finish("delete_item", change, |path| format!("Deleted {}", path))
    }

    /// Replace the content of the file at `path`.
    pub fn update_file_content(
        &mut self,
        path: &str,
        new_content: &str,
    ) -> Result<String, VfsError> {
        let change = self.replace_content(path, new_content);
        self.finish("update_file_content", change, |path| {
            format!("Saved {}", path)
        })
    }

    /// Rename the node at `path` in place; descendants follow.
    pub fn rename_item(&mut self, path: &str, new_name: &str) -> Result<String, VfsError> {
        let from = VfsPath::parse(path).to_string();
        let change = self.rename(path, new_name);
        self.finish("rename_item", change, |to| format!("Renamed {} to {}", from, to))
    }

    fn insert(&mut self, folder_path: &str, name: &str, node: Node) -> Result<Change, VfsError> {
        let parent = VfsPath::parse(folder_path);
        let folder = resolve_folder_mut(&mut self.root, &parent)?;
        let parent_stamp = folder.meta.modified_at;
        let path = folder.insert_child(name, node)?.path().to_string();

        Ok(Change {
            path,
            undo: Undo::Remove {
                parent,
                name: name.to_string(),
                parent_stamp,
            },
        })
    }

    fn remove(&mut self, raw: &str) -> Result<Change, VfsError> {
        let path = VfsPath::parse(raw);
        let (parent, name) = split_mutable(&path)?;
        let folder = resolve_folder_mut(&mut self.root, &parent)
            .map_err(|_| VfsError::NotFound(path.to_string()))?;
        let parent_stamp = folder.meta.modified_at;
        let node = folder.remove_child(&name)?;
        debug!(path = %path, nodes = count_nodes(&node), "Detached subtree");

        Ok(Change {
            path: path.to_string(),
            undo: Undo::Restore {
                parent,
                node,
                parent_stamp,
            },
        })
    }

    fn replace_content(&mut self, raw: &str, new_content: &str) -> Result<Change, VfsError> {
        let path = VfsPath::parse(raw);
        let (parent, name) = match (path.parent(), path.leaf()) {
            (Some(parent), Some(leaf)) => (parent, leaf.to_string()),
            _ => return Err(VfsError::NotAFile(path.to_string())),
        };
        let folder = resolve_folder_mut(&mut self.root, &parent)
            .map_err(|_| VfsError::NotFound(path.to_string()))?;
        let file = folder
            .child_mut(&name)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?
            .as_file_mut()
            .ok_or_else(|| VfsError::NotAFile(path.to_string()))?;

        let stamp = file.meta.modified_at;
        let content = file.set_content(new_content.to_string(), &self.codec);

        Ok(Change {
            path: path.to_string(),
            undo: Undo::Content {
                parent,
                name,
                content,
                stamp,
            },
        })
    }

    fn rename(&mut self, raw: &str, new_name: &str) -> Result<Change, VfsError> {
        let path = VfsPath::parse(raw);
        let (parent, name) = split_mutable(&path)?;
        let folder = resolve_folder_mut(&mut self.root, &parent)
            .map_err(|_| VfsError::NotFound(path.to_string()))?;
        let parent_stamp = folder.meta.modified_at;
        let stamp = folder
            .child(&name)
            .map(|node| node.meta().modified_at)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        let renamed = folder.rename_child(&name, new_name)?.path().to_string();

        Ok(Change {
            path: renamed,
            undo: Undo::Rename {
                parent,
                from: new_name.to_string(),
                to: name,
                parent_stamp,
                stamp,
            },
        })
    }

    /// Persist a completed change, notify, and return the affected path.
    fn finish(
        &mut self,
        operation: &'static str,
        change: Result<Change, VfsError>,
        describe: impl FnOnce(&str) -> String,
    ) -> Result<String, VfsError> {
        let result = change.and_then(|change| self.persist(change));
        match &result {
            Ok(path) => {
                info!(op = operation, path = %path, "Mutation persisted");
                self.notifier
                    .notify(Notification::success(operation, describe(path)));
            }
            Err(err) => {
                debug!(op = operation, error = %err, "Mutation rejected");
                self.notifier
                    .notify(Notification::error(operation, err.to_string()));
            }
        }
        result
    }

    fn persist(&mut self, change: Change) -> Result<String, VfsError> {
        if let Err(err) = self.gateway.save(&self.root) {
            error!(path = %change.path, error = %err, "Save failed, rolling back");
            if let Err(undo_err) = self.rollback(change.undo) {
                error!(error = %undo_err, "Rollback failed, in-memory tree differs from storage");
            }
            return Err(err.into());
        }
        Ok(change.path)
    }

    fn rollback(&mut self, undo: Undo) -> Result<(), VfsError> {
        match undo {
            Undo::Remove {
                parent,
                name,
                parent_stamp,
            } => {
                let folder = resolve_folder_mut(&mut self.root, &parent)?;
                folder.remove_child(&name)?;
                folder.meta.modified_at = parent_stamp;
            }
            Undo::Restore {
                parent,
                node,
                parent_stamp,
            } => {
                let folder = resolve_folder_mut(&mut self.root, &parent)?;
                let name = node.name().to_string();
                folder.insert_child(&name, node)?;
                folder.meta.modified_at = parent_stamp;
            }
            Undo::Content {
                parent,
                name,
                content,
                stamp,
            } => {
                let folder = resolve_folder_mut(&mut self.root, &parent)?;
                if let Some(file) = folder.child_mut(&name).and_then(Node::as_file_mut) {
                    file.set_content(content, &self.codec);
                    file.meta.modified_at = stamp;
                }
            }
            Undo::Rename {
                parent,
                from,
                to,
                parent_stamp,
                stamp,
            } => {
                let folder = resolve_folder_mut(&mut self.root, &parent)?;
                folder.rename_child(&from, &to)?;
                if let Some(node) = folder.child_mut(&to) {
                    node.meta_mut().modified_at = stamp;
                }
                folder.meta.modified_at = parent_stamp;
            }
        }
        Ok(())
    }
}

/// Split a delete/rename target into parent and leaf, refusing protected paths.
fn split_mutable(path: &VfsPath) -> Result<(VfsPath, String), VfsError> {
    if is_protected(path) {
        return Err(VfsError::Protected(path.to_string()));
    }
    match (path.parent(), path.leaf()) {
        (Some(parent), Some(leaf)) => Ok((parent, leaf.to_string())),
        _ => Err(VfsError::Protected(path.to_string())),
    }
}

fn push_subtree<'a>(node: NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    out.push(node);
    if let NodeRef::Folder(folder) = node {
        for child in folder.children() {
            push_subtree(NodeRef::from(child), out);
        }
    }
}

fn count_nodes(node: &Node) -> usize {
    match node {
        Node::File(_) => 1,
        Node::Folder(folder) => 1 + folder.children().map(count_nodes).sum::<usize>(),
    }
}
