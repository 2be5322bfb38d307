// security/src/policy.rs

//! Record access policy.
//!
//! A doctor may see a record when its id is in the record's authorized-doctor
//! set OR its specialization is in the authorized-specialization set. The
//! result only filters what a dashboard shows; it protects nothing.

use std::fmt;

use models::{Doctor, Identifier, MedicalRecord};
use serde::Serialize;

/// Which rule granted a doctor access to a record. Both may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLabel {
    Direct,
    Specialization,
}

impl AccessLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLabel::Direct => "direct access",
            AccessLabel::Specialization => "specialization access",
        }
    }
}

impl fmt::Display for AccessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn has_direct_access(record: &MedicalRecord, doctor: &Doctor) -> bool {
    record.authorized_doctors.contains(doctor.id().as_str())
}

pub fn has_specialization_access(record: &MedicalRecord, doctor: &Doctor) -> bool {
    record
        .authorized_specializations
        .contains(doctor.specialization.as_str())
}

/// Returns `true` if `doctor` may view `record`.
pub fn is_accessible(record: &MedicalRecord, doctor: &Doctor) -> bool {
    has_direct_access(record, doctor) || has_specialization_access(record, doctor)
}

/// Labels naming every rule that matched, direct first. Empty when the
/// record is not accessible.
pub fn access_labels(record: &MedicalRecord, doctor: &Doctor) -> Vec<AccessLabel> {
    let mut labels = Vec::with_capacity(2);
    if has_direct_access(record, doctor) {
        labels.push(AccessLabel::Direct);
    }
    if has_specialization_access(record, doctor) {
        labels.push(AccessLabel::Specialization);
    }
    labels
}

/// Ownership check used for a patient's own records. No set lookup.
pub fn is_owner(record: &MedicalRecord, patient_id: &Identifier) -> bool {
    record.is_owned_by(patient_id)
}
