// models/src/medical/account.rs

use serde::{Deserialize, Serialize};

use crate::identifiers::Identifier;
use crate::medical::{Doctor, Patient, Role, User};

/// A registered user together with its role-specific profile. This is the
/// shape kept under the `currentUser` session marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Account {
    Doctor(Doctor),
    Patient(Patient),
}

impl Account {
    pub fn user(&self) -> &User {
        match self {
            Account::Doctor(doctor) => &doctor.user,
            Account::Patient(patient) => &patient.user,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.user().id
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Doctor(_) => Role::Doctor,
            Account::Patient(_) => Role::Patient,
        }
    }
}

impl From<Doctor> for Account {
    fn from(doctor: Doctor) -> Self {
        Account::Doctor(doctor)
    }
}

impl From<Patient> for Account {
    fn from(patient: Patient) -> Self {
        Account::Patient(patient)
    }
}
