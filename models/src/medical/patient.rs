// models/src/medical/patient.rs

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CareError, CareResult, ValidationError};
use crate::medical::user::optional;
use crate::medical::{Role, User};
use crate::util::empty_string_as_none;

/// The fixed set of blood groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownBloodGroup(s.to_string()))
    }
}

/// Registration input for a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<BloodGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(flatten)]
    pub user: User,
    pub date_of_birth: NaiveDate,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none", skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
}

impl Patient {
    /// Creates a new `Patient` from a registration. Name, email and date of
    /// birth are required.
    pub fn from_registration(registration: PatientRegistration) -> CareResult<Self> {
        let user = User::register(Role::Patient, &registration.name, &registration.email)?;
        let date_of_birth = registration
            .date_of_birth
            .ok_or(CareError::MissingField("date of birth"))?;

        Ok(Patient {
            user,
            date_of_birth,
            phone: optional(registration.phone),
            address: optional(registration.address),
            blood_group: registration.blood_group,
        })
    }

    pub fn id(&self) -> &crate::Identifier {
        &self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_register_patient() {
        let patient = Patient::from_registration(PatientRegistration {
            name: "Alice".to_string(),
            email: "alice@home.test".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2),
            blood_group: Some(BloodGroup::ONegative),
            ..Default::default()
        })
        .unwrap();
        assert!(patient.id().starts_with("patient-"));
        assert_eq!(patient.user.role, Role::Patient);

        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value["dateOfBirth"], "1990-04-02");
        assert_eq!(value["bloodGroup"], "O-");
    }

    #[test]
    fn should_require_date_of_birth() {
        let result = Patient::from_registration(PatientRegistration {
            name: "Alice".to_string(),
            email: "alice@home.test".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(CareError::MissingField("date of birth"))));
    }

    #[test]
    fn should_require_email_before_anything_else() {
        let result = Patient::from_registration(PatientRegistration {
            name: "Alice".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(CareError::MissingField("email"))));
    }

    #[test]
    fn should_parse_blood_groups() {
        assert_eq!("ab+".parse::<BloodGroup>().unwrap(), BloodGroup::AbPositive);
        assert!("C+".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn should_read_blank_blood_group_as_absent() {
        let json = r#"{
            "id": "p1", "email": "a@b.c", "name": "Alice", "role": "patient",
            "createdAt": "2024-01-01T00:00:00Z", "dateOfBirth": "1990-01-01",
            "phone": "", "address": "", "bloodGroup": ""
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.blood_group, None);
        assert_eq!(patient.address, None);
    }
}
