//! Virtual file system tree
//!
//! Node types, path resolution, structural mutation primitives, the bootstrap
//! layout and whole-tree validation.

pub mod bootstrap;
pub mod node;
pub mod path;
pub mod store;
pub mod validate;

pub use bootstrap::{bootstrap_tree, is_protected, PROTECTED_PATHS};
pub use node::{FileNode, FolderNode, Node, NodeKind, NodeMeta, NodeRef};
pub use path::{resolve, resolve_folder_mut, Resolution, VfsPath};
pub use validate::{validate_tree, ValidationReport};
