// lib/src/storage_engine/storage_utils.rs

use std::collections::BTreeSet;

use models::errors::{CareError, CareResult};
use models::{Account, Doctor, Identifier, MedicalRecord, Patient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DOCTORS: &str = "doctors";
pub const PATIENTS: &str = "patients";
pub const MEDICAL_RECORDS: &str = "medicalRecords";
pub const CURRENT_USER: &str = "currentUser";

/// Entities stored in a collection keyed by their id.
pub trait Keyed {
    fn key(&self) -> &Identifier;
}

impl Keyed for Doctor {
    fn key(&self) -> &Identifier {
        self.id()
    }
}

impl Keyed for Patient {
    fn key(&self) -> &Identifier {
        self.id()
    }
}

impl Keyed for MedicalRecord {
    fn key(&self) -> &Identifier {
        &self.id
    }
}

/// Helper to serialize a stored entity to JSON bytes.
pub fn encode<T: Serialize>(value: &T) -> CareResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Helper to deserialize JSON bytes into a stored entity.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CareResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// The whole store as one document, laid out like the browser store it
/// replaces: each collection is an ordered array, the session a single value.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default, rename = "medicalRecords")]
    pub medical_records: Vec<MedicalRecord>,
    #[serde(default, rename = "currentUser", skip_serializing_if = "Option::is_none")]
    pub current_user: Option<Account>,
}

impl Collections {
    pub fn replace_authorization(
        &mut self,
        id: &Identifier,
        doctors: BTreeSet<String>,
        specializations: BTreeSet<String>,
    ) -> Option<MedicalRecord> {
        let record = self.medical_records.iter_mut().find(|record| &record.id == id)?;
        record.replace_authorization(doctors, specializations);
        Some(record.clone())
    }
}

/// Appends `item` unless an entry with the same id exists.
pub fn insert_unique<T: Keyed + Clone>(items: &mut Vec<T>, item: &T, collection: &str) -> CareResult<()> {
    if items.iter().any(|existing| existing.key() == item.key()) {
        return Err(CareError::AlreadyExists(format!("{} entry with id {}", collection, item.key())));
    }
    items.push(item.clone());
    Ok(())
}

pub fn find_by_key<'a, T: Keyed>(items: &'a [T], id: &Identifier) -> Option<&'a T> {
    items.iter().find(|item| item.key() == id)
}

pub fn remove_by_key<T: Keyed>(items: &mut Vec<T>, id: &Identifier) -> bool {
    let before = items.len();
    items.retain(|item| item.key() != id);
    items.len() != before
}
