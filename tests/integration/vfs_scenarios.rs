use simvfs::store::TREE_KEY;
use simvfs::{ErrorKind, NodeKind};

use crate::support::memory_service;

#[test]
fn create_file_in_documents() {
    let (mut vfs, kv, notifier) = memory_service();
    let path = vfs
        .create_file("/home/user/documents", "a.txt", "hello")
        .unwrap();
    assert_eq!(path, "/home/user/documents/a.txt");

    let file = vfs.get_item("/home/user/documents/a.txt").unwrap();
    let file = file.as_file().unwrap();
    assert_eq!(file.content(), "hello");
    assert_eq!(file.size(), 5);
    assert!(file.is_encoded());
    assert_eq!(file.encoded_content(), vfs.codec().encode("hello"));
    assert_eq!(
        file.meta.parent_id,
        Some(vfs.get_item("/home/user/documents").unwrap().id())
    );

    assert_eq!(kv.write_count(TREE_KEY), 1);
    let recorded = notifier.notifications();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].is_success());
}

#[test]
fn create_in_missing_folder_is_not_found() {
    let (mut vfs, kv, notifier) = memory_service();
    let err = vfs.create_file("/nope", "x.txt", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(kv.write_count(TREE_KEY), 0);
    assert!(!notifier.notifications()[0].is_success());
}

#[test]
fn duplicate_folder_is_already_exists() {
    let (mut vfs, kv, _) = memory_service();
    let before = vfs.root().clone();
    let err = vfs.create_folder("/home/user", "documents").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(vfs.root(), &before);
    assert_eq!(kv.write_count(TREE_KEY), 0);
}

#[test]
fn renamed_folder_accepts_new_children_under_new_path() {
    let (mut vfs, _, _) = memory_service();
    vfs.create_file("/home/user/documents", "a.txt", "hello")
        .unwrap();
    let renamed = vfs
        .rename_item("/home/user/documents", "docs2")
        .unwrap();
    assert_eq!(renamed, "/home/user/docs2");

    let created = vfs.create_file("/home/user/docs2", "b.txt", "").unwrap();
    assert_eq!(created, "/home/user/docs2/b.txt");
    assert!(vfs.get_item("/home/user/documents").is_none());
    assert!(vfs.get_item("/home/user/documents/a.txt").is_none());
    assert_eq!(
        vfs.get_item("/home/user/docs2/a.txt").unwrap().path(),
        "/home/user/docs2/a.txt"
    );
}

#[test]
fn delete_folder_drops_subtree() {
    let (mut vfs, _, _) = memory_service();
    vfs.create_folder("/tmp", "work").unwrap();
    vfs.create_folder("/tmp/work", "deep").unwrap();
    vfs.create_file("/tmp/work/deep", "x.txt", "x").unwrap();

    vfs.delete_item("/tmp/work").unwrap();
    assert!(vfs.get_item("/tmp/work/deep/x.txt").is_none());
    assert!(vfs.list_path("/tmp").is_empty());
    assert!(vfs.validate().is_valid());
}

#[test]
fn protected_paths_refuse_delete_and_rename() {
    let (mut vfs, kv, _) = memory_service();
    for path in ["/", "/home", "/home/user", "/bin", "/system", "/tmp"] {
        assert_eq!(vfs.delete_item(path).unwrap_err().kind(), ErrorKind::Protected);
        assert_eq!(
            vfs.rename_item(path, "other").unwrap_err().kind(),
            ErrorKind::Protected
        );
    }
    assert_eq!(kv.write_count(TREE_KEY), 0);
}

#[test]
fn update_content_rederives_size_and_encoding() {
    let (mut vfs, _, _) = memory_service();
    vfs.create_file("/tmp", "n.txt", "first").unwrap();
    vfs.update_file_content("/tmp/n.txt", "second draft").unwrap();

    let file = vfs.get_item("/tmp/n.txt").unwrap();
    let file = file.as_file().unwrap();
    assert_eq!(file.size(), 12);
    assert_eq!(file.encoded_content(), vfs.codec().encode("second draft"));
    let decoded = vfs.decode_file("/tmp/n.txt").unwrap();
    assert_eq!(decoded.original_len, 12);
    assert_eq!(decoded.preview, "second draft");
}

#[test]
fn updating_a_folder_is_not_a_file() {
    let (mut vfs, _, _) = memory_service();
    let err = vfs.update_file_content("/home/user", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAFile);
}

#[test]
fn list_path_is_name_ordered_and_empty_for_files() {
    let (mut vfs, _, _) = memory_service();
    for name in ["c.txt", "a.txt", "b.txt"] {
        vfs.create_file("/tmp", name, "").unwrap();
    }
    let names: Vec<&str> = vfs.list_path("/tmp").iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    assert!(vfs.list_path("/tmp/a.txt").is_empty());
    assert!(vfs.list_path("/missing").is_empty());
}

#[test]
fn root_is_addressable() {
    let (vfs, _, _) = memory_service();
    let root = vfs.get_item("/").unwrap();
    assert_eq!(root.kind(), NodeKind::Folder);
    assert_eq!(root.path(), "/");
    assert!(root.meta().parent_id.is_none());
}
