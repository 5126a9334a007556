//! Node types for the virtual file system tree
//!
//! A [`Node`] is either a [`FolderNode`] owning its children or a [`FileNode`]
//! carrying content. Ownership runs strictly parent to child; the upward link
//! is the non-owning `parent_id`.

use crate::codec::ContentCodec;
use crate::types::{now_after, NodeId, Timestamp, ROOT_PATH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attributes shared by folders and files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub id: NodeId,
    pub name: String,
    /// Owning folder; `None` only for the root
    pub parent_id: Option<NodeId>,
    /// Canonical absolute path, derived from the parent path and `name`
    pub path: String,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl NodeMeta {
    /// Fresh metadata for a node that is not attached to a folder yet
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            parent_id: None,
            path: String::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = now_after(self.modified_at);
    }
}

/// Folder: owns a name-keyed map of children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    #[serde(flatten)]
    pub meta: NodeMeta,
    #[serde(default)]
    pub(crate) children: BTreeMap<String, Node>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: NodeMeta::new(name),
            children: BTreeMap::new(),
        }
    }

    /// The single root folder, at `/`
    pub fn root() -> Self {
        let mut root = Self::new(ROOT_PATH);
        root.meta.path = ROOT_PATH.to_string();
        root
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Direct children, ordered by name
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.children.values_mut()
    }

    pub(crate) fn child_entries(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// File: authoritative content plus derived fields kept in step with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    #[serde(flatten)]
    pub meta: NodeMeta,
    content: String,
    encoded_content: String,
    is_encoded: bool,
    size: u64,
}

impl FileNode {
    /// Build a file and run its content through the codec.
    pub fn new(name: impl Into<String>, content: impl Into<String>, codec: &ContentCodec) -> Self {
        let content = content.into();
        Self {
            meta: NodeMeta::new(name),
            encoded_content: codec.encode(&content),
            is_encoded: true,
            size: content.len() as u64,
            content,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn encoded_content(&self) -> &str {
        &self.encoded_content
    }

    pub fn is_encoded(&self) -> bool {
        self.is_encoded
    }

    /// Byte length of `content`
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Replace content, re-deriving size and encoded form. Returns the previous content.
    pub(crate) fn set_content(&mut self, content: String, codec: &ContentCodec) -> String {
        self.size = content.len() as u64;
        self.encoded_content = codec.encode(&content);
        self.is_encoded = true;
        self.meta.touch();
        std::mem::replace(&mut self.content, content)
    }

    /// Re-run the codec over unchanged content (seed change).
    pub(crate) fn reencode(&mut self, codec: &ContentCodec) {
        self.encoded_content = codec.encode(&self.content);
        self.is_encoded = true;
    }
}

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(FolderNode),
    File(FileNode),
}

/// Node kind without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

impl Node {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Node::Folder(folder) => &folder.meta,
            Node::File(file) => &file.meta,
        }
    }

    pub(crate) fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Node::Folder(folder) => &mut folder.meta,
            Node::File(file) => &mut file.meta,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn path(&self) -> &str {
        &self.meta().path
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::File(_) => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    pub(crate) fn as_file_mut(&mut self) -> Option<&mut FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }
}

/// Borrowed view of a folder or file, including the root folder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Folder(&'a FolderNode),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn meta(&self) -> &'a NodeMeta {
        match *self {
            NodeRef::Folder(folder) => &folder.meta,
            NodeRef::File(file) => &file.meta,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id
    }

    pub fn name(&self) -> &'a str {
        &self.meta().name
    }

    pub fn path(&self) -> &'a str {
        &self.meta().path
    }

    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::Folder(_) => NodeKind::Folder,
            NodeRef::File(_) => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeRef::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeRef::File(_))
    }

    pub fn as_folder(&self) -> Option<&'a FolderNode> {
        match *self {
            NodeRef::Folder(folder) => Some(folder),
            NodeRef::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&'a FileNode> {
        match *self {
            NodeRef::File(file) => Some(file),
            NodeRef::Folder(_) => None,
        }
    }

    /// Owned copy of the node and its subtree
    pub fn to_node(&self) -> Node {
        match *self {
            NodeRef::Folder(folder) => Node::Folder((*folder).clone()),
            NodeRef::File(file) => Node::File((*file).clone()),
        }
    }
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Folder(folder) => NodeRef::Folder(folder),
            Node::File(file) => NodeRef::File(file),
        }
    }
}

impl<'a> From<&'a FolderNode> for NodeRef<'a> {
    fn from(folder: &'a FolderNode) -> Self {
        NodeRef::Folder(folder)
    }
}
