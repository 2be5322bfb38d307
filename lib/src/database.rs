// lib/src/database.rs

use std::sync::Arc;

use log::info;
use models::errors::CareResult;

use crate::accounts::AccountService;
use crate::config::StorageConfig;
use crate::records::RecordService;
use crate::storage_engine::{create_storage, RecordStore};

/// Wires the configured storage engine into the account and record services.
#[derive(Debug, Clone)]
pub struct Database {
    storage_engine: Arc<dyn RecordStore>,
    accounts: AccountService,
    records: RecordService,
}

impl Database {
    pub fn new(config: &StorageConfig) -> CareResult<Self> {
        let storage_engine = create_storage(config)?;
        info!(
            "Database ready ({} engine, {:?} authorization validation)",
            storage_engine.get_type(),
            config.authorization_validation
        );
        Ok(Self::with_store(storage_engine, config))
    }

    /// Builds the services over an already opened engine.
    pub fn with_store(storage_engine: Arc<dyn RecordStore>, config: &StorageConfig) -> Self {
        Database {
            accounts: AccountService::new(storage_engine.clone()),
            records: RecordService::new(storage_engine.clone(), config.authorization_validation),
            storage_engine,
        }
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn records(&self) -> &RecordService {
        &self.records
    }

    pub fn storage_engine(&self) -> &Arc<dyn RecordStore> {
        &self.storage_engine
    }

    pub async fn flush(&self) -> CareResult<()> {
        self.storage_engine.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageEngineType;
    use chrono::NaiveDate;
    use models::{NewMedicalRecord, PatientRegistration};

    #[tokio::test]
    async fn should_keep_session_and_records_in_json_file_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            storage_engine_type: StorageEngineType::JsonFile,
            data_directory: dir.path().to_path_buf(),
            ..StorageConfig::default()
        };

        let record_id = {
            let db = Database::new(&config).unwrap();
            let session = db
                .accounts()
                .register_patient(PatientRegistration {
                    name: "Alice".to_string(),
                    email: "alice@x.test".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(1970, 12, 1),
                    ..Default::default()
                })
                .await
                .unwrap();
            let record = db
                .records()
                .create_record(
                    &session,
                    NewMedicalRecord {
                        file_name: "note.txt".to_string(),
                        file_type: "text/plain".to_string(),
                        description: "GP note".to_string(),
                        file_data: "data:text/plain;base64,aGk=".to_string(),
                    },
                )
                .await
                .unwrap();
            record.id
        };

        let db = Database::new(&config).unwrap();
        assert_eq!(db.storage_engine().get_type(), "JsonFile");
        let session = db.accounts().current_session().await.unwrap().unwrap();
        let mine = db.records().list_mine(&session).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, record_id);
    }
}
