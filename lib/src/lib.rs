// lib/src/lib.rs

pub mod accounts;
pub mod config;
pub mod database;
pub mod records;
pub mod storage_engine;

pub use models::{CareError, CareResult, Identifier};

pub use crate::accounts::AccountService;
pub use crate::config::{load_storage_config_from_yaml, AuthorizationValidation, StorageConfig, StorageEngineType};
pub use crate::database::Database;
pub use crate::records::{
    AccessibleRecord, AuthorizationSummary, AuthorizationUpdate, PatientSummary, RecordService, RecordView,
};
pub use crate::storage_engine::{create_storage, InMemoryStorage, RecordStore, SledStorage};
