// lib/src/records.rs

//! Record lifecycle, the authorization editor and the dashboard listings.
//! Every operation takes the caller's `Session` explicitly.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, info, warn};
use models::errors::{CareError, CareResult};
use models::{Account, Doctor, Identifier, MedicalRecord, NewMedicalRecord, Patient, RecordKind, Specialization};
use security::{access_labels, is_owner, AccessLabel, Session};
use serde::Serialize;

use crate::config::AuthorizationValidation;
use crate::storage_engine::RecordStore;

/// The replacement authorization sets for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationUpdate {
    pub doctors: BTreeSet<String>,
    pub specializations: BTreeSet<String>,
}

impl AuthorizationUpdate {
    pub fn new<D, S>(doctors: D, specializations: S) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        AuthorizationUpdate {
            doctors: doctors.into_iter().map(Into::into).collect(),
            specializations: specializations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Counts shown next to a record on the patient dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizationSummary {
    pub doctors: usize,
    pub specializations: usize,
}

impl From<&MedicalRecord> for AuthorizationSummary {
    fn from(record: &MedicalRecord) -> Self {
        AuthorizationSummary {
            doctors: record.authorized_doctors.len(),
            specializations: record.authorized_specializations.len(),
        }
    }
}

/// The owner of a record as a viewer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub id: Option<Identifier>,
    pub name: String,
    pub email: Option<String>,
}

impl PatientSummary {
    /// Placeholder for records whose patient no longer resolves.
    pub fn unknown() -> Self {
        PatientSummary {
            id: None,
            name: "Unknown".to_string(),
            email: None,
        }
    }
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        PatientSummary {
            id: Some(patient.id().clone()),
            name: patient.user.name.clone(),
            email: Some(patient.user.email.clone()),
        }
    }
}

/// A record on a doctor's dashboard with its owner and the rules that
/// granted access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibleRecord {
    pub record: MedicalRecord,
    pub patient: PatientSummary,
    pub labels: Vec<AccessLabel>,
}

/// Everything the record viewer needs. `labels` is empty for the owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub record: MedicalRecord,
    pub patient: PatientSummary,
    pub labels: Vec<AccessLabel>,
    pub kind: RecordKind,
}

#[derive(Debug, Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
    validation: AuthorizationValidation,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, validation: AuthorizationValidation) -> Self {
        RecordService { store, validation }
    }

    /// Stores a new record owned by the session's patient with no one
    /// authorized.
    pub async fn create_record(&self, session: &Session, upload: NewMedicalRecord) -> CareResult<MedicalRecord> {
        let patient = session.require_patient()?;
        let record = MedicalRecord::new(patient.id().clone(), upload)?;
        self.store.insert_record(&record).await?;
        self.store.flush().await?;
        info!("Patient {} uploaded record {} ({})", patient.id(), record.id, record.file_name);
        Ok(record)
    }

    /// The session patient's own records, in upload order.
    pub async fn list_mine(&self, session: &Session) -> CareResult<Vec<MedicalRecord>> {
        let patient = session.require_patient()?;
        Ok(self
            .store
            .list_records()
            .await?
            .into_iter()
            .filter(|record| is_owner(record, patient.id()))
            .collect())
    }

    /// Every record the session's doctor may view, with its owner and
    /// access labels. Owners that no longer resolve show as "Unknown".
    pub async fn list_accessible(&self, session: &Session) -> CareResult<Vec<AccessibleRecord>> {
        let doctor = session.require_doctor()?;
        let patients: HashMap<Identifier, PatientSummary> = self
            .store
            .list_patients()
            .await?
            .iter()
            .map(|patient| (patient.id().clone(), PatientSummary::from(patient)))
            .collect();

        Ok(self
            .store
            .list_records()
            .await?
            .into_iter()
            .filter_map(|record| {
                let labels = access_labels(&record, doctor);
                if labels.is_empty() {
                    return None;
                }
                let patient = patients
                    .get(&record.patient_id)
                    .cloned()
                    .unwrap_or_else(PatientSummary::unknown);
                Some(AccessibleRecord { record, patient, labels })
            })
            .collect())
    }

    /// Replaces both authorization sets of a record owned by the session's
    /// patient. Applying the same update twice leaves the same state.
    pub async fn update_authorization(
        &self,
        session: &Session,
        record_id: &Identifier,
        update: AuthorizationUpdate,
    ) -> CareResult<MedicalRecord> {
        let patient = session.require_patient()?;
        let record = self.owned_record(patient, record_id).await?;
        let update = self.validate(update).await?;

        let updated = self
            .store
            .replace_authorization(&record.id, update.doctors, update.specializations)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("medical record {}", record_id)))?;
        self.store.flush().await?;
        info!(
            "Record {} now shared with {} doctors and {} specializations",
            updated.id,
            updated.authorized_doctors.len(),
            updated.authorized_specializations.len()
        );
        Ok(updated)
    }

    /// Permanently removes a record owned by the session's patient. Returns
    /// `false` when no record has that id.
    pub async fn delete_record(&self, session: &Session, record_id: &Identifier) -> CareResult<bool> {
        let patient = session.require_patient()?;
        match self.store.get_record(record_id).await? {
            None => {
                debug!("Delete of unknown record {} ignored", record_id);
                Ok(false)
            }
            Some(record) if !is_owner(&record, patient.id()) => Err(not_owner(record_id)),
            Some(_) => {
                let removed = self.store.delete_record(record_id).await?;
                self.store.flush().await?;
                info!("Deleted record {}", record_id);
                Ok(removed)
            }
        }
    }

    /// Opens one record. Patients may open their own records and doctors
    /// the records accessible to them.
    pub async fn view_record(&self, session: &Session, record_id: &Identifier) -> CareResult<RecordView> {
        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("medical record {}", record_id)))?;

        let labels = match session.account() {
            Account::Patient(patient) => {
                if !is_owner(&record, patient.id()) {
                    return Err(not_owner(record_id));
                }
                Vec::new()
            }
            Account::Doctor(doctor) => {
                let labels = access_labels(&record, doctor);
                if labels.is_empty() {
                    return Err(CareError::PermissionDenied(format!(
                        "record {} is not shared with doctor {}",
                        record_id,
                        doctor.id()
                    )));
                }
                labels
            }
        };

        let patient = match self.store.get_patient(&record.patient_id).await? {
            Some(patient) => PatientSummary::from(&patient),
            None => {
                warn!("Record {} references missing patient {}", record.id, record.patient_id);
                PatientSummary::unknown()
            }
        };

        Ok(RecordView {
            kind: record.kind(),
            record,
            patient,
            labels,
        })
    }

    /// The doctor roster, used to pick direct grants.
    pub async fn list_doctors(&self) -> CareResult<Vec<Doctor>> {
        self.store.list_doctors().await
    }

    /// Every fixed specialization with the number of registered doctors
    /// holding it.
    pub async fn specialization_roster(&self) -> CareResult<Vec<(Specialization, usize)>> {
        let doctors = self.store.list_doctors().await?;
        Ok(Specialization::ALL
            .into_iter()
            .map(|specialization| {
                let count = doctors
                    .iter()
                    .filter(|doctor| doctor.specialization == specialization)
                    .count();
                (specialization, count)
            })
            .collect())
    }

    async fn owned_record(&self, patient: &Patient, record_id: &Identifier) -> CareResult<MedicalRecord> {
        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("medical record {}", record_id)))?;
        if !is_owner(&record, patient.id()) {
            return Err(not_owner(record_id));
        }
        Ok(record)
    }

    async fn validate(&self, update: AuthorizationUpdate) -> CareResult<AuthorizationUpdate> {
        if self.validation == AuthorizationValidation::Accept {
            let unmatched = unmatched_specializations(&update.specializations);
            if !unmatched.is_empty() {
                warn!(
                    "Storing specializations no doctor can hold: {}",
                    unmatched.join(", ")
                );
            }
            return Ok(update);
        }

        let roster: BTreeSet<String> = self
            .store
            .list_doctors()
            .await?
            .into_iter()
            .map(|doctor| doctor.user.id.into())
            .collect();

        let mut unknown = Vec::new();
        let doctors = update
            .doctors
            .into_iter()
            .filter(|id| {
                let known = roster.contains(id);
                if !known {
                    unknown.push(id.clone());
                }
                known
            })
            .collect();
        let specializations = update
            .specializations
            .into_iter()
            .filter_map(|value| match value.parse::<Specialization>() {
                Ok(specialization) => Some(specialization.as_str().to_string()),
                Err(_) => {
                    unknown.push(value);
                    None
                }
            })
            .collect();

        if !unknown.is_empty() {
            if self.validation == AuthorizationValidation::Reject {
                return Err(CareError::InvalidData(format!(
                    "unknown doctors or specializations: {}",
                    unknown.join(", ")
                )));
            }
            debug!("Dropping unknown authorization values: {:?}", unknown);
        }
        Ok(AuthorizationUpdate { doctors, specializations })
    }
}

/// Values that are not the exact display name of a fixed specialization.
/// Matching is exact, so these grant nothing.
fn unmatched_specializations(values: &BTreeSet<String>) -> Vec<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|value| !Specialization::ALL.iter().any(|spec| spec.as_str() == *value))
        .collect()
}

fn not_owner(record_id: &Identifier) -> CareError {
    CareError::PermissionDenied(format!("record {} belongs to another patient", record_id))
}
