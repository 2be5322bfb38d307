// models/src/medical/specialization.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The fixed set of doctor specializations. Stored as display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Specialization {
    Cardiology,
    Dermatology,
    Neurology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    Radiology,
    #[serde(rename = "General Practice")]
    GeneralPractice,
    Surgery,
    Oncology,
}

impl Specialization {
    pub const ALL: [Specialization; 10] = [
        Specialization::Cardiology,
        Specialization::Dermatology,
        Specialization::Neurology,
        Specialization::Orthopedics,
        Specialization::Pediatrics,
        Specialization::Psychiatry,
        Specialization::Radiology,
        Specialization::GeneralPractice,
        Specialization::Surgery,
        Specialization::Oncology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::Cardiology => "Cardiology",
            Specialization::Dermatology => "Dermatology",
            Specialization::Neurology => "Neurology",
            Specialization::Orthopedics => "Orthopedics",
            Specialization::Pediatrics => "Pediatrics",
            Specialization::Psychiatry => "Psychiatry",
            Specialization::Radiology => "Radiology",
            Specialization::GeneralPractice => "General Practice",
            Specialization::Surgery => "Surgery",
            Specialization::Oncology => "Oncology",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = ValidationError;

    /// Accepts the display string case-insensitively; `general-practice`
    /// and `general_practice` are read as "General Practice".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Specialization::ALL
            .into_iter()
            .find(|spec| spec.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ValidationError::UnknownSpecialization(s.to_string()))
    }
}
