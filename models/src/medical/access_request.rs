// models/src/medical/access_request.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    Pending,
    Approved,
    Denied,
}

/// A doctor's request to view a record.
///
/// Declared for document compatibility only: no operation creates, approves
/// or denies one, and access is governed solely by a record's authorization
/// sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub id: Identifier,
    pub doctor_id: Identifier,
    pub patient_id: Identifier,
    pub record_id: Identifier,
    pub status: AccessRequestStatus,
    pub request_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_stored_access_request() {
        let json = r#"{
            "id": "req-1", "doctorId": "d1", "patientId": "p1", "recordId": "r1",
            "status": "pending", "requestDate": "2024-02-03T04:05:06Z"
        }"#;
        let request: AccessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, AccessRequestStatus::Pending);
        assert_eq!(request.record_id.as_str(), "r1");
    }
}
