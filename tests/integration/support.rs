use simvfs::notify::RecordingNotifier;
use simvfs::store::{MemoryKeyValueStore, PersistenceGateway, SledKeyValueStore};
use simvfs::VfsService;
use std::path::Path;

pub const SEED: &str = "integration-seed";

/// Service over a fresh in-memory store; the store handle shares its entries.
pub fn memory_service() -> (VfsService, MemoryKeyValueStore, RecordingNotifier) {
    let kv = MemoryKeyValueStore::new();
    let notifier = RecordingNotifier::new();
    let service = VfsService::builder(PersistenceGateway::new(kv.clone()))
        .seed(SEED)
        .notifier(notifier.clone())
        .open()
        .unwrap();
    (service, kv, notifier)
}

/// Service over a sled database in `dir`.
pub fn sled_service(dir: &Path) -> VfsService {
    let kv = SledKeyValueStore::open(dir).unwrap();
    VfsService::builder(PersistenceGateway::new(kv))
        .seed(SEED)
        .notifier(simvfs::notify::NullNotifier)
        .open()
        .unwrap()
}
