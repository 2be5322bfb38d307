// models/src/medical/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CareError, CareResult};
use crate::identifiers::Identifier;
use crate::medical::Role;

/// The identity part shared by doctors and patients. Stored flattened into
/// the role-specific document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Identifier,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh user for `role`, minting its id and creation time.
    /// Name and email are required; surrounding whitespace is dropped.
    pub fn register(role: Role, name: &str, email: &str) -> CareResult<Self> {
        let name = require("name", name)?;
        let email = require("email", email)?;
        Ok(User {
            id: Identifier::generate(role.id_prefix()),
            email,
            name,
            role,
            created_at: Utc::now(),
        })
    }
}

/// Returns the trimmed value, or `MissingField` when it is blank.
pub(crate) fn require(field: &'static str, value: &str) -> CareResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CareError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Trims an optional text field, dropping it when blank.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
