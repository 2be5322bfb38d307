// models/src/medical/doctor.rs

use serde::{Deserialize, Serialize};

use crate::errors::{CareError, CareResult};
use crate::medical::user::{optional, require};
use crate::medical::{Role, Specialization, User};
use crate::util::empty_string_as_none;

/// Registration input for a doctor, as collected by a sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub specialization: Option<Specialization>,
    pub license_number: String,
    pub hospital: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(flatten)]
    pub user: User,
    pub specialization: Specialization,
    pub license_number: String,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Years of experience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
}

impl Doctor {
    /// Creates a new `Doctor` from a registration, checking required fields
    /// and minting the id and creation timestamp.
    pub fn from_registration(registration: DoctorRegistration) -> CareResult<Self> {
        let user = User::register(Role::Doctor, &registration.name, &registration.email)?;
        let specialization = registration
            .specialization
            .ok_or(CareError::MissingField("specialization"))?;
        let license_number = require("license number", &registration.license_number)?;

        Ok(Doctor {
            user,
            specialization,
            license_number,
            hospital: optional(registration.hospital),
            phone: optional(registration.phone),
            experience: registration.experience,
        })
    }

    pub fn id(&self) -> &crate::Identifier {
        &self.user.id
    }
}
