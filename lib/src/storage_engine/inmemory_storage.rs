// lib/src/storage_engine/inmemory_storage.rs

//! The in-memory engine. Without a path it is volatile; with a path every
//! mutation rewrites a single JSON document atomically (temp file + rename),
//! which is the `json_file` engine.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use models::errors::{CareError, CareResult};
use models::{Account, Doctor, Identifier, MedicalRecord, Patient};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use super::storage_engine::RecordStore;
use super::storage_utils::{find_by_key, insert_unique, remove_by_key, Collections, DOCTORS, MEDICAL_RECORDS, PATIENTS};

#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    collections: Arc<RwLock<Collections>>,
    path: Option<PathBuf>,
}

impl InMemoryStorage {
    /// Creates a volatile store.
    pub fn new() -> Self {
        InMemoryStorage {
            collections: Arc::new(RwLock::new(Collections::default())),
            path: None,
        }
    }

    /// Opens the JSON document at `path`, starting empty if it does not
    /// exist yet. Parent directories are created on demand.
    pub fn open<P: Into<PathBuf>>(path: P) -> CareResult<Self> {
        let path = path.into();
        let collections = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let collections: Collections = serde_json::from_reader(reader)?;
            info!(
                "Loaded store {:?}: {} doctors, {} patients, {} records",
                path,
                collections.doctors.len(),
                collections.patients.len(),
                collections.medical_records.len()
            );
            collections
        } else {
            info!("Creating new store at {:?}", path);
            Collections::default()
        };

        Ok(InMemoryStorage {
            collections: Arc::new(RwLock::new(collections)),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // Serializes the collections and atomically replaces the document.
    fn sync_internal(&self, collections: &Collections) -> CareResult<()> {
        let Some(persist_path) = self.path.as_ref() else {
            return Ok(());
        };
        let parent = match persist_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let temp = NamedTempFile::new_in(&parent)?;
        {
            let mut buf = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut buf, collections)?;
            buf.flush()?;
        }
        temp.persist(persist_path)
            .map_err(|e| CareError::Io(e.error))?;
        debug!("Persisted store to {:?}", persist_path);
        Ok(())
    }

    // Applies `mutate` to a copy, persists it, and only then publishes it, so
    // a failed write leaves the previous state in place.
    async fn mutate<T, F>(&self, mutate: F) -> CareResult<T>
    where
        F: FnOnce(&mut Collections) -> CareResult<T> + Send,
        T: Send,
    {
        let mut guard = self.collections.write().await;
        let mut next = guard.clone();
        let out = mutate(&mut next)?;
        self.sync_internal(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStorage {
    fn get_type(&self) -> &'static str {
        if self.path.is_some() {
            "JsonFile"
        } else {
            "InMemory"
        }
    }

    async fn insert_doctor(&self, doctor: &Doctor) -> CareResult<()> {
        self.mutate(|c| insert_unique(&mut c.doctors, doctor, DOCTORS)).await
    }

    async fn get_doctor(&self, id: &Identifier) -> CareResult<Option<Doctor>> {
        let collections = self.collections.read().await;
        Ok(find_by_key(&collections.doctors, id).cloned())
    }

    async fn list_doctors(&self) -> CareResult<Vec<Doctor>> {
        Ok(self.collections.read().await.doctors.clone())
    }

    async fn insert_patient(&self, patient: &Patient) -> CareResult<()> {
        self.mutate(|c| insert_unique(&mut c.patients, patient, PATIENTS)).await
    }

    async fn get_patient(&self, id: &Identifier) -> CareResult<Option<Patient>> {
        let collections = self.collections.read().await;
        Ok(find_by_key(&collections.patients, id).cloned())
    }

    async fn list_patients(&self) -> CareResult<Vec<Patient>> {
        Ok(self.collections.read().await.patients.clone())
    }

    async fn insert_record(&self, record: &MedicalRecord) -> CareResult<()> {
        self.mutate(|c| insert_unique(&mut c.medical_records, record, MEDICAL_RECORDS)).await
    }

    async fn get_record(&self, id: &Identifier) -> CareResult<Option<MedicalRecord>> {
        let collections = self.collections.read().await;
        Ok(find_by_key(&collections.medical_records, id).cloned())
    }

    async fn list_records(&self) -> CareResult<Vec<MedicalRecord>> {
        Ok(self.collections.read().await.medical_records.clone())
    }

    async fn replace_authorization(
        &self,
        id: &Identifier,
        doctors: BTreeSet<String>,
        specializations: BTreeSet<String>,
    ) -> CareResult<Option<MedicalRecord>> {
        self.mutate(|c| Ok(c.replace_authorization(id, doctors, specializations)))
            .await
    }

    async fn delete_record(&self, id: &Identifier) -> CareResult<bool> {
        self.mutate(|c| Ok(remove_by_key(&mut c.medical_records, id))).await
    }

    async fn current_user(&self) -> CareResult<Option<Account>> {
        Ok(self.collections.read().await.current_user.clone())
    }

    async fn set_current_user(&self, account: Option<&Account>) -> CareResult<()> {
        let account = account.cloned();
        self.mutate(|c| {
            c.current_user = account;
            Ok(())
        })
        .await
    }

    // Every mutation is already on disk once it returns.
    async fn flush(&self) -> CareResult<()> {
        Ok(())
    }
}
