// lib/src/storage_engine/storage_engine.rs

use std::collections::BTreeSet;
use std::fmt::Debug;

use async_trait::async_trait;
use models::errors::CareResult;
use models::{Account, Doctor, Identifier, MedicalRecord, Patient};

/// The persistence dependency injected into every service. Each engine keeps
/// four collections: `doctors`, `patients`, `medicalRecords` and the
/// `currentUser` session marker. Listings come back in insertion order.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    fn get_type(&self) -> &'static str;

    /// Adds a doctor. Fails with `AlreadyExists` if the id is taken.
    async fn insert_doctor(&self, doctor: &Doctor) -> CareResult<()>;
    async fn get_doctor(&self, id: &Identifier) -> CareResult<Option<Doctor>>;
    async fn list_doctors(&self) -> CareResult<Vec<Doctor>>;

    /// Adds a patient. Fails with `AlreadyExists` if the id is taken.
    async fn insert_patient(&self, patient: &Patient) -> CareResult<()>;
    async fn get_patient(&self, id: &Identifier) -> CareResult<Option<Patient>>;
    async fn list_patients(&self) -> CareResult<Vec<Patient>>;

    async fn find_doctor_by_email(&self, email: &str) -> CareResult<Option<Doctor>> {
        Ok(self
            .list_doctors()
            .await?
            .into_iter()
            .find(|doctor| doctor.user.email == email))
    }

    async fn find_patient_by_email(&self, email: &str) -> CareResult<Option<Patient>> {
        Ok(self
            .list_patients()
            .await?
            .into_iter()
            .find(|patient| patient.user.email == email))
    }

    /// Adds a record. Fails with `AlreadyExists` if the id is taken.
    async fn insert_record(&self, record: &MedicalRecord) -> CareResult<()>;
    async fn get_record(&self, id: &Identifier) -> CareResult<Option<MedicalRecord>>;
    async fn list_records(&self) -> CareResult<Vec<MedicalRecord>>;

    /// Atomically overwrites both authorization sets of one record and
    /// returns the stored result, or `None` when no record has that id.
    async fn replace_authorization(
        &self,
        id: &Identifier,
        doctors: BTreeSet<String>,
        specializations: BTreeSet<String>,
    ) -> CareResult<Option<MedicalRecord>>;

    /// Removes a record. Returns whether anything was removed.
    async fn delete_record(&self, id: &Identifier) -> CareResult<bool>;

    async fn current_user(&self) -> CareResult<Option<Account>>;
    /// Stores the session marker; `None` clears it.
    async fn set_current_user(&self, account: Option<&Account>) -> CareResult<()>;

    /// Makes every completed write durable.
    async fn flush(&self) -> CareResult<()> {
        Ok(())
    }
}
