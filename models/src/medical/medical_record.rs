// medical_record.rs
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CareError, CareResult};
use crate::identifiers::{IdPrefix, Identifier};
use crate::util::lenient_string_set;

/// Upload input for a new record. The payload is an opaque text blob
/// (typically a `data:` URL) produced by whatever read the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub file_name: String,
    pub file_type: String,
    pub description: String,
    pub file_data: String,
}

/// How a viewer should present the payload, derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Image,
    Pdf,
    Other,
}

impl RecordKind {
    pub fn from_mime(file_type: &str) -> Self {
        if file_type.starts_with("image/") {
            RecordKind::Image
        } else if file_type == "application/pdf" {
            RecordKind::Pdf
        } else {
            RecordKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Identifier,
    pub patient_id: Identifier,
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    pub file_data: String,
    /// Doctor ids granted direct access. Stored as given, never validated
    /// here.
    #[serde(default, deserialize_with = "lenient_string_set")]
    pub authorized_doctors: BTreeSet<String>,
    /// Specializations whose doctors may view the record.
    #[serde(default, deserialize_with = "lenient_string_set")]
    pub authorized_specializations: BTreeSet<String>,
}

impl MedicalRecord {
    /// Creates a record owned by `patient_id` with both authorization sets
    /// empty. File name, payload and description are required, in that order.
    pub fn new(patient_id: Identifier, upload: NewMedicalRecord) -> CareResult<Self> {
        if upload.file_name.trim().is_empty() || upload.file_data.is_empty() {
            return Err(CareError::MissingField("file"));
        }
        if upload.description.trim().is_empty() {
            return Err(CareError::MissingField("description"));
        }

        Ok(MedicalRecord {
            id: Identifier::generate(IdPrefix::Record),
            patient_id,
            file_name: upload.file_name,
            file_type: upload.file_type,
            upload_date: Utc::now(),
            description: upload.description,
            file_data: upload.file_data,
            authorized_doctors: BTreeSet::new(),
            authorized_specializations: BTreeSet::new(),
        })
    }

    pub fn is_owned_by(&self, patient_id: &Identifier) -> bool {
        &self.patient_id == patient_id
    }

    /// Overwrites both authorization sets. Nothing else changes.
    pub fn replace_authorization(&mut self, doctors: BTreeSet<String>, specializations: BTreeSet<String>) {
        self.authorized_doctors = doctors;
        self.authorized_specializations = specializations;
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_mime(&self.file_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> NewMedicalRecord {
        NewMedicalRecord {
            file_name: "ecg.png".to_string(),
            file_type: "image/png".to_string(),
            description: "Resting ECG".to_string(),
            file_data: "data:image/png;base64,AAAA".to_string(),
        }
    }

    #[test]
    fn should_create_record_with_empty_authorization() {
        let owner = Identifier::new("p1".to_string()).unwrap();
        let record = MedicalRecord::new(owner.clone(), upload()).unwrap();
        assert!(record.id.starts_with("record-"));
        assert!(record.is_owned_by(&owner));
        assert!(record.authorized_doctors.is_empty());
        assert!(record.authorized_specializations.is_empty());
        assert_eq!(record.kind(), RecordKind::Image);
    }

    #[test]
    fn should_require_file_then_description() {
        let owner = Identifier::new("p1".to_string()).unwrap();
        let mut no_file = upload();
        no_file.file_data.clear();
        assert!(matches!(MedicalRecord::new(owner.clone(), no_file), Err(CareError::MissingField("file"))));

        let mut no_description = upload();
        no_description.description = String::new();
        assert!(matches!(MedicalRecord::new(owner, no_description), Err(CareError::MissingField("description"))));
    }

    #[test]
    fn should_classify_mime_types() {
        assert_eq!(RecordKind::from_mime("application/pdf"), RecordKind::Pdf);
        assert_eq!(RecordKind::from_mime("image/jpeg"), RecordKind::Image);
        assert_eq!(RecordKind::from_mime("text/plain"), RecordKind::Other);
        assert_eq!(RecordKind::from_mime(""), RecordKind::Other);
    }

    #[test]
    fn should_read_record_with_missing_authorization_lists() {
        let json = r#"{
            "id": "r1", "patientId": "p1", "fileName": "a.pdf", "fileType": "application/pdf",
            "uploadDate": "2024-05-01T10:00:00Z", "description": "labs", "fileData": "xyz"
        }"#;
        let record: MedicalRecord = serde_json::from_str(json).unwrap();
        assert!(record.authorized_doctors.is_empty());
        assert!(record.authorized_specializations.is_empty());
    }

    #[test]
    fn should_replace_authorization_wholesale() {
        let owner = Identifier::new("p1".to_string()).unwrap();
        let mut record = MedicalRecord::new(owner, upload()).unwrap();
        record.replace_authorization(
            BTreeSet::from(["d1".to_string(), "d2".to_string()]),
            BTreeSet::from(["Cardiology".to_string()]),
        );
        record.replace_authorization(BTreeSet::from(["d3".to_string()]), BTreeSet::new());
        assert_eq!(record.authorized_doctors, BTreeSet::from(["d3".to_string()]));
        assert!(record.authorized_specializations.is_empty());
    }
}
