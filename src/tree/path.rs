//! Path parsing and resolution
//!
//! Paths are `/`-delimited and absolute; empty segments from leading, trailing
//! or repeated slashes are ignored. Resolution walks from the root one segment
//! at a time and never mutates the tree.

use crate::error::VfsError;
use crate::tree::node::{FolderNode, Node};
use crate::types::{ROOT_PATH, SEPARATOR};
use std::fmt;

/// Parsed absolute path
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment; `None` for the root
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Containing folder path; `None` for the root
    pub fn parent(&self) -> Option<VfsPath> {
        if self.is_root() {
            return None;
        }
        Some(self.prefix(self.segments.len() - 1))
    }

    /// First `len` segments
    pub fn prefix(&self, len: usize) -> VfsPath {
        VfsPath {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    pub fn join(&self, name: &str) -> VfsPath {
        let mut joined = self.clone();
        joined.segments.extend(
            name.split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
        joined
    }

    /// Whether `self` is `other` or lies beneath it
    pub fn starts_with(&self, other: &VfsPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(ROOT_PATH);
        }
        for segment in &self.segments {
            write!(f, "{}{}", SEPARATOR, segment)?;
        }
        Ok(())
    }
}

impl From<&str> for VfsPath {
    fn from(raw: &str) -> Self {
        VfsPath::parse(raw)
    }
}

/// Canonical path of `name` inside the folder at `parent_path`
pub fn join_path(parent_path: &str, name: &str) -> String {
    if parent_path == ROOT_PATH {
        format!("{}{}", SEPARATOR, name)
    } else {
        format!("{}{}{}", parent_path, SEPARATOR, name)
    }
}

/// Check a node name: non-empty, no separator, not `.` or `..`.
pub fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name.contains(SEPARATOR) || name == "." || name == ".." {
        return Err(VfsError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Outcome of resolving a path against the tree
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The path is `/`
    Root(&'a FolderNode),
    /// The path names an existing node
    Found {
        parent: &'a FolderNode,
        name: String,
        node: &'a Node,
    },
    /// The parent folder exists but has no child with the leaf name
    Vacant { parent: &'a FolderNode, name: String },
    /// Not even the parent exists; `reached` is the deepest folder walked
    Unreachable { reached: VfsPath, name: String },
}

impl<'a> Resolution<'a> {
    pub fn node(&self) -> Option<&'a Node> {
        match self {
            Resolution::Found { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<&'a FolderNode> {
        match self {
            Resolution::Found { parent, .. } | Resolution::Vacant { parent, .. } => Some(parent),
            _ => None,
        }
    }

    pub fn leaf_name(&self) -> Option<&str> {
        match self {
            Resolution::Root(_) => None,
            Resolution::Found { name, .. }
            | Resolution::Vacant { name, .. }
            | Resolution::Unreachable { name, .. } => Some(name),
        }
    }

    /// Folder the path names, whether the root or a nested folder
    pub fn folder(&self) -> Option<&'a FolderNode> {
        match self {
            Resolution::Root(root) => Some(root),
            Resolution::Found { node, .. } => node.as_folder(),
            _ => None,
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, Resolution::Root(_) | Resolution::Found { .. })
    }
}

/// Resolve `path` against the tree rooted at `root`.
pub fn resolve<'a>(root: &'a FolderNode, path: &VfsPath) -> Resolution<'a> {
    let (leaf, ancestors) = match path.segments().split_last() {
        Some(split) => split,
        None => return Resolution::Root(root),
    };

    let mut current = root;
    for (depth, segment) in ancestors.iter().enumerate() {
        match current.child(segment) {
            Some(Node::Folder(folder)) => current = folder,
            _ => {
                return Resolution::Unreachable {
                    reached: path.prefix(depth),
                    name: leaf.clone(),
                }
            }
        }
    }

    match current.child(leaf) {
        Some(node) => Resolution::Found {
            parent: current,
            name: leaf.clone(),
            node,
        },
        None => Resolution::Vacant {
            parent: current,
            name: leaf.clone(),
        },
    }
}

/// Walk to the folder at `path` for mutation.
pub fn resolve_folder_mut<'a>(
    root: &'a mut FolderNode,
    path: &VfsPath,
) -> Result<&'a mut FolderNode, VfsError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match current.child_mut(segment) {
            Some(Node::Folder(folder)) => folder,
            Some(Node::File(_)) => {
                return Err(VfsError::NotAFolder(path.prefix(depth + 1).to_string()))
            }
            None => return Err(VfsError::NotFound(path.prefix(depth + 1).to_string())),
        };
    }
    Ok(current)
}
