// lib/src/storage_engine/sled_storage.rs

use std::collections::BTreeSet;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, warn};
use models::errors::{CareError, CareResult};
use models::{Account, Doctor, Identifier, MedicalRecord, Patient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use sled::{Db, Tree};

use super::storage_engine::RecordStore;
use super::storage_utils::{decode, encode, Keyed, CURRENT_USER, DOCTORS, MEDICAL_RECORDS, PATIENTS};

fn transaction_error(err: TransactionError<()>, on_abort: impl FnOnce() -> CareError) -> CareError {
    match err {
        TransactionError::Abort(()) => on_abort(),
        TransactionError::Storage(e) => CareError::Sled(e),
    }
}

/// One collection as a pair of trees: `entries` maps a big-endian sequence
/// number to the JSON entity, which keeps iteration in insertion order, and
/// `index` maps the entity id to its sequence number.
#[derive(Debug, Clone)]
struct SledCollection<T> {
    name: &'static str,
    entries: Tree,
    index: Tree,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SledCollection<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    fn open(db: &Db, name: &'static str) -> CareResult<Self> {
        Ok(SledCollection {
            name,
            entries: db.open_tree(name)?,
            index: db.open_tree(format!("{}_index", name))?,
            _marker: PhantomData,
        })
    }

    fn insert(&self, db: &Db, item: &T) -> CareResult<()> {
        let key = item.key().as_bytes();
        let seq = db.generate_id()?.to_be_bytes();
        let bytes = encode(item)?;

        (&self.entries, &self.index)
            .transaction(|(entries, index)| {
                if index.get(key)?.is_some() {
                    return Err(ConflictableTransactionError::Abort(()));
                }
                index.insert(key, &seq[..])?;
                entries.insert(&seq[..], bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e| {
                transaction_error(e, || {
                    CareError::AlreadyExists(format!("{} entry with id {}", self.name, item.key()))
                })
            })?;
        debug!("Inserted {} into {}", item.key(), self.name);
        Ok(())
    }

    fn get(&self, id: &Identifier) -> CareResult<Option<T>> {
        let Some(seq) = self.index.get(id.as_bytes())? else {
            return Ok(None);
        };
        match self.entries.get(&seq)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => {
                warn!("Index of {} points at missing entry for {}", self.name, id);
                Ok(None)
            }
        }
    }

    fn list(&self) -> CareResult<Vec<T>> {
        self.entries
            .iter()
            .values()
            .map(|value| decode(&value?))
            .collect()
    }

    fn remove(&self, id: &Identifier) -> CareResult<bool> {
        let key = id.as_bytes();
        (&self.entries, &self.index)
            .transaction(|(entries, index)| {
                let Some(seq) = index.remove(key)? else {
                    return Ok(false);
                };
                entries.remove(seq)?;
                Ok(true)
            })
            .map_err(|e| transaction_error(e, || CareError::NotFound(id.to_string())))
    }

    // Read-modify-write on a single entry, retried until no concurrent writer
    // got in between.
    fn update<F>(&self, id: &Identifier, mut apply: F) -> CareResult<Option<T>>
    where
        F: FnMut(&mut T),
    {
        loop {
            let Some(seq) = self.index.get(id.as_bytes())? else {
                return Ok(None);
            };
            let Some(current) = self.entries.get(&seq)? else {
                return Ok(None);
            };
            let mut item: T = decode(&current)?;
            apply(&mut item);
            let next = encode(&item)?;
            match self.entries.compare_and_swap(&seq, Some(&current[..]), Some(next))? {
                Ok(()) => return Ok(Some(item)),
                Err(_) => debug!("Concurrent update of {} in {}, retrying", id, self.name),
            }
        }
    }
}

/// The embedded on-disk engine.
#[derive(Debug, Clone)]
pub struct SledStorage {
    db: Db,
    path: PathBuf,
    doctors: SledCollection<Doctor>,
    patients: SledCollection<Patient>,
    records: SledCollection<MedicalRecord>,
}

impl SledStorage {
    pub fn open<P: AsRef<Path>>(path: P, cache_capacity: u64) -> CareResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = open_sled_db(&path, cache_capacity)?;
        Ok(SledStorage {
            doctors: SledCollection::open(&db, DOCTORS)?,
            patients: SledCollection::open(&db, PATIENTS)?,
            records: SledCollection::open(&db, MEDICAL_RECORDS)?,
            db,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn open_sled_db(path: &Path, cache_capacity: u64) -> CareResult<Db> {
    if !path.exists() {
        info!("Creating sled directory at {:?}", path);
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(CareError::StorageError(format!("Path {:?} is not a directory", path)));
    }

    let db = sled::Config::new()
        .path(path)
        .cache_capacity(cache_capacity)
        .open()
        .map_err(|e| CareError::StorageError(format!("Failed to open sled database at {:?}: {}", path, e)))?;
    info!("Opened sled database at {:?}", path);
    Ok(db)
}

#[async_trait]
impl RecordStore for SledStorage {
    fn get_type(&self) -> &'static str {
        "Sled"
    }

    async fn insert_doctor(&self, doctor: &Doctor) -> CareResult<()> {
        self.doctors.insert(&self.db, doctor)
    }

    async fn get_doctor(&self, id: &Identifier) -> CareResult<Option<Doctor>> {
        self.doctors.get(id)
    }

    async fn list_doctors(&self) -> CareResult<Vec<Doctor>> {
        self.doctors.list()
    }

    async fn insert_patient(&self, patient: &Patient) -> CareResult<()> {
        self.patients.insert(&self.db, patient)
    }

    async fn get_patient(&self, id: &Identifier) -> CareResult<Option<Patient>> {
        self.patients.get(id)
    }

    async fn list_patients(&self) -> CareResult<Vec<Patient>> {
        self.patients.list()
    }

    async fn insert_record(&self, record: &MedicalRecord) -> CareResult<()> {
        self.records.insert(&self.db, record)
    }

    async fn get_record(&self, id: &Identifier) -> CareResult<Option<MedicalRecord>> {
        self.records.get(id)
    }

    async fn list_records(&self) -> CareResult<Vec<MedicalRecord>> {
        self.records.list()
    }

    async fn replace_authorization(
        &self,
        id: &Identifier,
        doctors: BTreeSet<String>,
        specializations: BTreeSet<String>,
    ) -> CareResult<Option<MedicalRecord>> {
        self.records.update(id, |record| {
            record.replace_authorization(doctors.clone(), specializations.clone())
        })
    }

    async fn delete_record(&self, id: &Identifier) -> CareResult<bool> {
        self.records.remove(id)
    }

    async fn current_user(&self) -> CareResult<Option<Account>> {
        match self.db.get(CURRENT_USER)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set_current_user(&self, account: Option<&Account>) -> CareResult<()> {
        match account {
            Some(account) => {
                self.db.insert(CURRENT_USER, encode(account)?)?;
            }
            None => {
                self.db.remove(CURRENT_USER)?;
            }
        }
        Ok(())
    }

    async fn flush(&self) -> CareResult<()> {
        let bytes = self.db.flush_async().await?;
        debug!("Flushed {} bytes to {:?}", bytes, self.path);
        Ok(())
    }
}
