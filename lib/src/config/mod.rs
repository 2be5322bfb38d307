// lib/src/config/mod.rs

pub mod config_defaults;
pub mod config_structs;

pub use config_defaults::*;
pub use config_structs::{load_storage_config_from_yaml, AuthorizationValidation, StorageConfig, StorageEngineType};
