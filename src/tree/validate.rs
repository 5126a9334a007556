//! Structural validation of a whole tree.

use crate::codec::ContentCodec;
use crate::tree::node::{FolderNode, Node};
use crate::tree::path::{join_path, validate_name};
use crate::types::{NodeId, ROOT_PATH};
use serde::Serialize;
use std::collections::HashSet;

/// Result of validating a tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub node_count: usize,
    /// Broken invariants; a tree with errors is treated as corrupted
    pub errors: Vec<String>,
    /// Repairable drift, e.g. content encoded under another seed
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every invariant of the tree rooted at `root`.
///
/// With a codec, files whose encoded form does not match the codec's output
/// are reported as warnings.
pub fn validate_tree(root: &FolderNode, codec: Option<&ContentCodec>) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();

    if root.meta.name != ROOT_PATH || root.meta.path != ROOT_PATH {
        report.errors.push(format!(
            "root must be named and located at {} (name {:?}, path {:?})",
            ROOT_PATH, root.meta.name, root.meta.path
        ));
    }
    if root.meta.parent_id.is_some() {
        report.errors.push("root must not have a parent".to_string());
    }
    seen.insert(root.meta.id);
    report.node_count += 1;

    check_folder(root, codec, &mut seen, &mut report);
    report
}

fn check_folder(
    folder: &FolderNode,
    codec: Option<&ContentCodec>,
    seen: &mut HashSet<NodeId>,
    report: &mut ValidationReport,
) {
    for (key, child) in folder.child_entries() {
        report.node_count += 1;
        let meta = child.meta();
        let expected_path = join_path(&folder.meta.path, key);

        if key != &meta.name {
            report.errors.push(format!(
                "{}: entry key {:?} does not match node name {:?}",
                expected_path, key, meta.name
            ));
        }
        if validate_name(key).is_err() {
            report
                .errors
                .push(format!("{}: invalid name {:?}", expected_path, key));
        }
        if meta.path != expected_path {
            report.errors.push(format!(
                "{}: stored path {:?} is stale",
                expected_path, meta.path
            ));
        }
        if meta.parent_id != Some(folder.meta.id) {
            report
                .errors
                .push(format!("{}: parent_id does not name its folder", expected_path));
        }
        if !seen.insert(meta.id) {
            report
                .errors
                .push(format!("{}: duplicate id {}", expected_path, meta.id));
        }
        if meta.modified_at < meta.created_at {
            report
                .warnings
                .push(format!("{}: modified before created", expected_path));
        }

        match child {
            Node::Folder(sub) => check_folder(sub, codec, seen, report),
            Node::File(file) => {
                if file.size() != file.content().len() as u64 {
                    report.errors.push(format!(
                        "{}: size {} does not match content length {}",
                        expected_path,
                        file.size(),
                        file.content().len()
                    ));
                }
                if !file.is_encoded() {
                    report
                        .errors
                        .push(format!("{}: file was never encoded", expected_path));
                } else if let Some(codec) = codec {
                    if !codec.verify(file.content(), file.encoded_content()) {
                        report.warnings.push(format!(
                            "{}: encoded content does not match current seed",
                            expected_path
                        ));
                    }
                }
            }
        }
    }
}
