// lib/src/storage_engine/mod.rs

pub mod storage_engine;
pub mod storage_utils;
pub mod inmemory_storage;
pub mod sled_storage;
#[cfg(test)]
pub mod test_suite;

pub use storage_engine::RecordStore;
pub use inmemory_storage::InMemoryStorage;
pub use sled_storage::{open_sled_db, SledStorage};

use std::sync::Arc;

use log::info;
use models::errors::CareResult;

use crate::config::{StorageConfig, StorageEngineType};

/// Creates the storage engine selected by the configuration.
pub fn create_storage(config: &StorageConfig) -> CareResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.storage_engine_type {
        StorageEngineType::InMemory => Arc::new(InMemoryStorage::new()),
        StorageEngineType::JsonFile => Arc::new(InMemoryStorage::open(config.store_file())?),
        StorageEngineType::Sled => Arc::new(SledStorage::open(config.sled_path(), config.cache_capacity)?),
    };
    info!("Using {} storage engine", store.get_type());
    Ok(store)
}
