use proptest::prelude::*;
use simvfs::NodeRef;

use crate::support::memory_service;

#[derive(Debug, Clone)]
enum Op {
    File(usize, String),
    Folder(usize, String),
    Delete(usize),
    Rename(usize, String),
    Update(usize, String),
}

fn name() -> impl Strategy<Value = String> {
    "[a-e]{1,3}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), name()).prop_map(|(i, n)| Op::File(i, n)),
        (any::<usize>(), name()).prop_map(|(i, n)| Op::Folder(i, n)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), name()).prop_map(|(i, n)| Op::Rename(i, n)),
        (any::<usize>(), ".{0,20}").prop_map(|(i, c)| Op::Update(i, c)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever sequence of operations runs, successful or not, the tree stays
    /// structurally valid and every node's path is its parent path plus its name.
    #[test]
    fn random_operations_keep_tree_valid(ops in prop::collection::vec(op(), 1..40)) {
        let (mut vfs, _, _) = memory_service();
        for op in ops {
            let folders: Vec<String> = vfs
                .walk("/tmp")
                .into_iter()
                .filter(|n| n.is_folder())
                .map(|n| n.path().to_string())
                .collect();
            let everything: Vec<String> = vfs
                .walk("/tmp")
                .into_iter()
                .skip(1)
                .map(|n| n.path().to_string())
                .collect();

            let _ = match op {
                Op::File(i, n) => vfs.create_file(&folders[i % folders.len()], &n, "x"),
                Op::Folder(i, n) => vfs.create_folder(&folders[i % folders.len()], &n),
                Op::Delete(i) if !everything.is_empty() => {
                    vfs.delete_item(&everything[i % everything.len()])
                }
                Op::Rename(i, n) if !everything.is_empty() => {
                    vfs.rename_item(&everything[i % everything.len()], &n)
                }
                Op::Update(i, c) if !everything.is_empty() => {
                    vfs.update_file_content(&everything[i % everything.len()], &c)
                }
                _ => continue,
            };

            let report = vfs.validate();
            prop_assert!(report.is_valid(), "{:?}", report.errors);
        }

        for node in vfs.walk("/") {
            if let NodeRef::File(file) = node {
                prop_assert_eq!(file.size(), file.content().len() as u64);
            }
        }
    }
}

proptest! {
    #[test]
    fn updated_content_reads_back(content in ".{0,200}") {
        let (mut vfs, _, _) = memory_service();
        vfs.create_file("/home/user/documents", "r.txt", "").unwrap();
        vfs.update_file_content("/home/user/documents/r.txt", &content).unwrap();

        let file = vfs.get_item("/home/user/documents/r.txt").unwrap();
        let file = file.as_file().unwrap();
        prop_assert_eq!(file.content(), content.as_str());
        prop_assert_eq!(file.size(), content.len() as u64);
        prop_assert_eq!(file.encoded_content(), vfs.codec().encode(&content));
    }

    #[test]
    fn new_files_start_empty_and_encoded(name in "[a-z][a-z0-9_.-]{0,15}") {
        let (mut vfs, _, _) = memory_service();
        let path = vfs.create_file("/tmp", &name, "").unwrap();
        let file = vfs.get_item(&path).unwrap();
        let file = file.as_file().unwrap();
        prop_assert_eq!(file.content(), "");
        prop_assert_eq!(file.size(), 0);
        prop_assert!(file.is_encoded());
    }
}
