// lib/src/storage_engine/test_suite.rs

//! Shared behaviour tests run against every `RecordStore` engine.

use chrono::NaiveDate;
use models::{
    Doctor, DoctorRegistration, MedicalRecord, NewMedicalRecord, Patient, PatientRegistration, Specialization,
};

pub fn sample_doctor(email: &str, specialization: Specialization) -> Doctor {
    Doctor::from_registration(DoctorRegistration {
        name: format!("Dr {}", email),
        email: email.to_string(),
        specialization: Some(specialization),
        license_number: "LIC-42".to_string(),
        hospital: Some("St. Elsewhere".to_string()),
        phone: None,
        experience: Some(7),
    })
    .unwrap()
}

pub fn sample_patient(email: &str) -> Patient {
    Patient::from_registration(PatientRegistration {
        name: format!("Patient {}", email),
        email: email.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15),
        ..Default::default()
    })
    .unwrap()
}

pub fn sample_record(owner: &Patient) -> MedicalRecord {
    MedicalRecord::new(
        owner.id().clone(),
        NewMedicalRecord {
            file_name: "bloodwork.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            description: "Annual bloodwork".to_string(),
            file_data: "data:application/pdf;base64,JVBERi0xLjQKJcfs\u{e9}".to_string(),
        },
    )
    .unwrap()
}

/// Expands to a set of `#[tokio::test]`s exercising the engine built by
/// `$store`. The expression is evaluated once per test.
#[macro_export]
macro_rules! store_test_impl {
    ($store:expr) => {
        use std::collections::BTreeSet;
        use models::{CareError, Specialization};
        use $crate::storage_engine::storage_engine::RecordStore;
        use $crate::storage_engine::test_suite::{sample_doctor, sample_patient, sample_record};

        #[tokio::test]
        async fn should_list_entries_in_insertion_order() {
            let store = $store;
            let emails = ["c@x.test", "a@x.test", "b@x.test"];
            let mut expected = Vec::new();
            for email in emails {
                let doctor = sample_doctor(email, Specialization::Radiology);
                store.insert_doctor(&doctor).await.unwrap();
                expected.push(doctor);
            }
            assert_eq!(store.list_doctors().await.unwrap(), expected);
        }

        #[tokio::test]
        async fn should_reject_duplicate_ids() {
            let store = $store;
            let patient = sample_patient("alice@x.test");
            store.insert_patient(&patient).await.unwrap();
            let again = store.insert_patient(&patient).await;
            assert!(matches!(again, Err(CareError::AlreadyExists(_))));
            assert_eq!(store.list_patients().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn should_scope_email_lookup_to_collection() {
            let store = $store;
            let doctor = sample_doctor("x@y.com", Specialization::Cardiology);
            store.insert_doctor(&doctor).await.unwrap();

            assert_eq!(store.find_doctor_by_email("x@y.com").await.unwrap(), Some(doctor.clone()));
            assert_eq!(store.find_patient_by_email("x@y.com").await.unwrap(), None);
            assert_eq!(store.get_doctor(doctor.id()).await.unwrap(), Some(doctor));
        }

        #[tokio::test]
        async fn should_keep_payload_byte_identical() {
            let store = $store;
            let patient = sample_patient("alice@x.test");
            let record = sample_record(&patient);
            store.insert_record(&record).await.unwrap();

            let stored = store.get_record(&record.id).await.unwrap().unwrap();
            assert_eq!(stored.file_data.as_bytes(), record.file_data.as_bytes());
            assert_eq!(stored, record);
        }

        #[tokio::test]
        async fn should_replace_authorization_of_one_record_only() {
            let store = $store;
            let patient = sample_patient("alice@x.test");
            let first = sample_record(&patient);
            let second = sample_record(&patient);
            store.insert_record(&first).await.unwrap();
            store.insert_record(&second).await.unwrap();

            let doctors = BTreeSet::from(["d1".to_string()]);
            let specializations = BTreeSet::from(["Cardiology".to_string()]);
            let updated = store
                .replace_authorization(&first.id, doctors.clone(), specializations.clone())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.authorized_doctors, doctors);
            assert_eq!(updated.authorized_specializations, specializations);
            assert_eq!(updated.file_data, first.file_data);
            assert_eq!(updated.upload_date, first.upload_date);

            // Same edit again: identical stored state.
            store
                .replace_authorization(&first.id, doctors.clone(), specializations.clone())
                .await
                .unwrap();
            let records = store.list_records().await.unwrap();
            assert_eq!(records, vec![updated, second]);
        }

        #[tokio::test]
        async fn should_return_none_for_unknown_record_edit() {
            let store = $store;
            let missing = models::Identifier::new("record-missing".to_string()).unwrap();
            let result = store
                .replace_authorization(&missing, BTreeSet::new(), BTreeSet::new())
                .await
                .unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn should_delete_records_permanently() {
            let store = $store;
            let patient = sample_patient("alice@x.test");
            let keep = sample_record(&patient);
            let gone = sample_record(&patient);
            store.insert_record(&keep).await.unwrap();
            store.insert_record(&gone).await.unwrap();

            assert!(store.delete_record(&gone.id).await.unwrap());
            assert!(!store.delete_record(&gone.id).await.unwrap());
            assert_eq!(store.get_record(&gone.id).await.unwrap(), None);
            assert_eq!(store.list_records().await.unwrap(), vec![keep]);
        }

        #[tokio::test]
        async fn should_store_and_clear_session_marker() {
            let store = $store;
            assert_eq!(store.current_user().await.unwrap(), None);

            let doctor = sample_doctor("bob@x.test", Specialization::Cardiology);
            let account = models::Account::from(doctor);
            store.set_current_user(Some(&account)).await.unwrap();
            assert_eq!(store.current_user().await.unwrap(), Some(account));

            store.set_current_user(None).await.unwrap();
            assert_eq!(store.current_user().await.unwrap(), None);
            store.flush().await.unwrap();
        }
    };
}
