use simvfs::codec::ContentCodec;
use simvfs::store::{
    KeyValueStore, MemoryKeyValueStore, PersistenceGateway, SledKeyValueStore, TreeOrigin,
    TREE_KEY,
};
use simvfs::{ErrorKind, VfsService};
use tempfile::TempDir;

use crate::support::{memory_service, sled_service};

#[test]
fn tree_survives_reopen_of_sled_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store");

    {
        let mut vfs = sled_service(&store);
        assert_eq!(vfs.origin(), &TreeOrigin::Bootstrap);
        vfs.create_folder("/home/user/documents", "notes").unwrap();
        vfs.create_file("/home/user/documents/notes", "todo.txt", "buy milk")
            .unwrap();
        vfs.rename_item("/home/user/pictures", "photos").unwrap();
    }

    let vfs = sled_service(&store);
    assert_eq!(vfs.origin(), &TreeOrigin::Stored);
    assert_eq!(
        vfs.read_file("/home/user/documents/notes/todo.txt").unwrap(),
        "buy milk"
    );
    assert!(vfs.get_item("/home/user/photos").is_some());
    assert!(vfs.get_item("/home/user/pictures").is_none());
    assert!(vfs.validate().is_valid());
}

#[test]
fn bootstrap_is_not_saved_until_first_mutation() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store");
    drop(sled_service(&store));

    let kv = SledKeyValueStore::open(&store).unwrap();
    assert!(kv.get(TREE_KEY).unwrap().is_none());
}

#[test]
fn corrupted_store_falls_back_to_bootstrap() {
    let kv = MemoryKeyValueStore::new();
    kv.put(TREE_KEY, br#"{"type":"folder","name":"/"}"#).unwrap();

    let vfs = VfsService::builder(PersistenceGateway::new(kv.clone()))
        .seed("s")
        .open()
        .unwrap();
    assert!(matches!(vfs.origin(), TreeOrigin::Recovered { .. }));
    assert!(vfs.get_item("/home/user/desktop").is_some());
}

#[test]
fn changed_seed_reencodes_on_open() {
    let kv = MemoryKeyValueStore::new();
    {
        let mut vfs = VfsService::builder(PersistenceGateway::new(kv.clone()))
            .seed("first")
            .open()
            .unwrap();
        vfs.create_file("/tmp", "a.txt", "abc").unwrap();
    }

    let vfs = VfsService::builder(PersistenceGateway::new(kv))
        .seed("second")
        .open()
        .unwrap();
    assert!(matches!(vfs.origin(), TreeOrigin::Reencoded { .. }));
    let file = vfs.get_item("/tmp/a.txt").unwrap();
    assert_eq!(
        file.as_file().unwrap().encoded_content(),
        ContentCodec::new("second").encode("abc")
    );
    assert!(vfs.validate().warnings.is_empty());
}

#[test]
fn failed_save_leaves_tree_unchanged() {
    let (mut vfs, kv, notifier) = memory_service();
    vfs.create_file("/tmp", "keep.txt", "v1").unwrap();
    let before = vfs.root().clone();
    notifier.drain();

    kv.set_read_only(true);
    let err = vfs.create_file("/tmp", "new.txt", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(
        vfs.update_file_content("/tmp/keep.txt", "v2").unwrap_err().kind(),
        ErrorKind::Storage
    );
    assert_eq!(vfs.delete_item("/tmp/keep.txt").unwrap_err().kind(), ErrorKind::Storage);
    assert_eq!(
        vfs.rename_item("/tmp/keep.txt", "moved.txt").unwrap_err().kind(),
        ErrorKind::Storage
    );
    assert_eq!(vfs.root(), &before);
    assert!(notifier.drain().iter().all(|n| !n.is_success()));

    kv.set_read_only(false);
    vfs.update_file_content("/tmp/keep.txt", "v2").unwrap();
    assert_eq!(vfs.read_file("/tmp/keep.txt").unwrap(), "v2");
}
