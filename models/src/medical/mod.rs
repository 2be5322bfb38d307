// models/src/medical/mod.rs

pub mod access_request;
pub mod account;
pub mod doctor;
pub mod medical_record;
pub mod patient;
pub mod role;
pub mod specialization;
pub mod user;

pub use access_request::{AccessRequest, AccessRequestStatus};
pub use account::Account;
pub use doctor::{Doctor, DoctorRegistration};
pub use medical_record::{MedicalRecord, NewMedicalRecord, RecordKind};
pub use patient::{BloodGroup, Patient, PatientRegistration};
pub use role::Role;
pub use specialization::Specialization;
pub use user::User;
