//! Bootstrap layout and protected paths
//!
//! The tree a fresh (or corrupted) store starts from, and the structural paths
//! that can never be deleted or renamed.

use crate::codec::ContentCodec;
use crate::error::VfsError;
use crate::tree::node::{FileNode, FolderNode, Node};
use crate::tree::path::{resolve_folder_mut, VfsPath};

/// Folders created at bootstrap, parents before children
pub const BOOTSTRAP_FOLDERS: &[&str] = &[
    "/bin",
    "/home",
    "/home/user",
    "/home/user/desktop",
    "/home/user/documents",
    "/home/user/downloads",
    "/home/user/pictures",
    "/system",
    "/tmp",
];

/// Files created at bootstrap: (path, content)
pub const BOOTSTRAP_FILES: &[(&str, &str)] = &[
    (
        "/home/user/desktop/welcome.txt",
        "Welcome! Files you create here are kept between sessions.\n",
    ),
    ("/system/version", "simvfs 0.3\n"),
];

/// Paths that reject delete and rename
pub const PROTECTED_PATHS: &[&str] = &["/", "/bin", "/home", "/home/user", "/system", "/tmp"];

pub fn is_protected(path: &VfsPath) -> bool {
    PROTECTED_PATHS
        .iter()
        .any(|protected| VfsPath::parse(protected) == *path)
}

/// Build the bootstrap tree, encoding its files with `codec`.
pub fn bootstrap_tree(codec: &ContentCodec) -> Result<FolderNode, VfsError> {
    let mut root = FolderNode::root();

    for raw in BOOTSTRAP_FOLDERS {
        let (parent, name) = split(raw)?;
        resolve_folder_mut(&mut root, &parent)?
            .insert_child(&name, Node::Folder(FolderNode::new(name.as_str())))?;
    }
    for (raw, content) in BOOTSTRAP_FILES {
        let (parent, name) = split(raw)?;
        resolve_folder_mut(&mut root, &parent)?.insert_child(
            &name,
            Node::File(FileNode::new(name.as_str(), *content, codec)),
        )?;
    }

    Ok(root)
}

fn split(raw: &str) -> Result<(VfsPath, String), VfsError> {
    let path = VfsPath::parse(raw);
    match (path.parent(), path.leaf()) {
        (Some(parent), Some(leaf)) => Ok((parent, leaf.to_string())),
        _ => Err(VfsError::InvalidName(raw.to_string())),
    }
}
