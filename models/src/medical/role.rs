// models/src/medical/role.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::identifiers::IdPrefix;

/// The role tag carried by every user. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    /// Name of the stored collection holding users of this role.
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Doctor => "doctors",
            Role::Patient => "patients",
        }
    }

    pub fn id_prefix(&self) -> IdPrefix {
        match self {
            Role::Doctor => IdPrefix::Doctor,
            Role::Patient => IdPrefix::Patient,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}
