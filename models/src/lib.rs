// models/src/lib.rs

//! Entities shared across Care Sync: users, doctors, patients, medical
//! records and the error type every crate reports with.

pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod util;

pub use errors::{CareError, CareResult, ValidationError};
pub use identifiers::{IdPrefix, Identifier};
pub use medical::{
    AccessRequest, AccessRequestStatus, Account, BloodGroup, Doctor, DoctorRegistration, MedicalRecord,
    NewMedicalRecord, Patient, PatientRegistration, RecordKind, Role, Specialization, User,
};
