// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::config::config_structs::{AuthorizationValidation, StorageEngineType};

pub const DEFAULT_CONFIG_FILE: &str = "caresync.yaml";
pub const DEFAULT_DATA_DIRECTORY: &str = "./caresync_data";
pub const DEFAULT_STORE_FILE_NAME: &str = "caresync.json";
pub const DEFAULT_SLED_DIRECTORY_NAME: &str = "sled";
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

pub fn default_storage_engine_type() -> StorageEngineType {
    StorageEngineType::JsonFile
}

pub fn default_data_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIRECTORY)
}

pub fn default_authorization_validation() -> AuthorizationValidation {
    AuthorizationValidation::Accept
}

pub fn default_cache_capacity() -> u64 {
    DEFAULT_CACHE_CAPACITY
}
