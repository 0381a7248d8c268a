pub mod file_store;
pub mod kv;
pub mod memory_store;
pub mod sqlite_store;

use crate::config::{Settings, StoreLocation};
use crate::domain::repository::TaskRepository;
use crate::error::StorageError;

use file_store::FileStore;
use kv::KvTaskRepository;
use memory_store::MemoryStore;
use sqlite_store::SqliteStore;

pub async fn open_repository(settings: &Settings) -> Result<Box<dyn TaskRepository>, StorageError> {
    let key = settings.record_key.clone();
    let repo: Box<dyn TaskRepository> = match &settings.store {
        StoreLocation::Sqlite(url) => Box::new(KvTaskRepository::new(SqliteStore::connect(url).await?, key)),
        StoreLocation::File(path) => Box::new(KvTaskRepository::new(FileStore::new(path), key)),
        StoreLocation::Memory => Box::new(KvTaskRepository::new(MemoryStore::default(), key)),
    };
    tracing::info!(store = ?settings.store, key = %settings.record_key, "opened task store");
    Ok(repo)
}
