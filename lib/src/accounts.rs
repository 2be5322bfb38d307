// lib/src/accounts.rs

//! Registration and the mock login flow. Login is a lookup by email within
//! one role's collection; there are no credentials.

use std::sync::Arc;

use log::info;
use models::errors::{CareError, CareResult};
use models::{Account, Doctor, DoctorRegistration, Patient, PatientRegistration, Role};
use security::Session;

use crate::storage_engine::RecordStore;

#[derive(Debug, Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        AccountService { store }
    }

    /// Registers a doctor and logs them in. Emails are unique per role.
    pub async fn register_doctor(&self, registration: DoctorRegistration) -> CareResult<Session> {
        let doctor = Doctor::from_registration(registration)?;
        if self.store.find_doctor_by_email(&doctor.user.email).await?.is_some() {
            return Err(CareError::AlreadyExists(format!("doctor with email {}", doctor.user.email)));
        }
        self.store.insert_doctor(&doctor).await?;
        info!("Registered doctor {} ({})", doctor.id(), doctor.specialization);
        self.start_session(Account::Doctor(doctor)).await
    }

    /// Registers a patient and logs them in. Emails are unique per role.
    pub async fn register_patient(&self, registration: PatientRegistration) -> CareResult<Session> {
        let patient = Patient::from_registration(registration)?;
        if self.store.find_patient_by_email(&patient.user.email).await?.is_some() {
            return Err(CareError::AlreadyExists(format!("patient with email {}", patient.user.email)));
        }
        self.store.insert_patient(&patient).await?;
        info!("Registered patient {}", patient.id());
        self.start_session(Account::Patient(patient)).await
    }

    /// Looks `email` up in `role`'s collection only.
    pub async fn login(&self, email: &str, role: Role) -> CareResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CareError::MissingField("email"));
        }

        let account = match role {
            Role::Doctor => self.store.find_doctor_by_email(email).await?.map(Account::Doctor),
            Role::Patient => self.store.find_patient_by_email(email).await?.map(Account::Patient),
        };
        let account = account.ok_or_else(|| CareError::UserNotFound {
            email: email.to_string(),
            role,
        })?;
        self.start_session(account).await
    }

    pub async fn logout(&self) -> CareResult<()> {
        self.store.set_current_user(None).await?;
        self.store.flush().await
    }

    pub async fn current_session(&self) -> CareResult<Option<Session>> {
        Ok(self.store.current_user().await?.map(Session::new))
    }

    /// The current session, or `PermissionDenied` when nobody is logged in.
    pub async fn require_session(&self) -> CareResult<Session> {
        self.current_session()
            .await?
            .ok_or_else(|| CareError::PermissionDenied("not logged in".to_string()))
    }

    async fn start_session(&self, account: Account) -> CareResult<Session> {
        self.store.set_current_user(Some(&account)).await?;
        self.store.flush().await?;
        info!("Logged in {} as {}", account.user().email, account.role());
        Ok(Session::new(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::InMemoryStorage;
    use chrono::NaiveDate;
    use models::Specialization;

    fn service() -> AccountService {
        AccountService::new(Arc::new(InMemoryStorage::new()))
    }

    fn doctor(email: &str) -> DoctorRegistration {
        DoctorRegistration {
            name: "Bob".to_string(),
            email: email.to_string(),
            specialization: Some(Specialization::Cardiology),
            license_number: "MD-1".to_string(),
            ..Default::default()
        }
    }

    fn patient(email: &str) -> PatientRegistration {
        PatientRegistration {
            name: "Alice".to_string(),
            email: email.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 4),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn should_register_and_start_session() {
        let accounts = service();
        let session = accounts.register_patient(patient("alice@x.test")).await.unwrap();
        assert_eq!(session.role(), Role::Patient);
        assert!(session.user_id().starts_with("patient-"));

        let current = accounts.current_session().await.unwrap().unwrap();
        assert_eq!(current, session);
    }

    #[tokio::test]
    async fn should_scope_login_to_role() {
        let accounts = service();
        accounts.register_doctor(doctor("x@y.com")).await.unwrap();
        accounts.logout().await.unwrap();

        let result = accounts.login("x@y.com", Role::Patient).await;
        match result {
            Err(CareError::UserNotFound { email, role }) => {
                assert_eq!(email, "x@y.com");
                assert_eq!(role, Role::Patient);
            }
            other => panic!("expected UserNotFound, got {:?}", other),
        }
        assert!(accounts.current_session().await.unwrap().is_none());

        let session = accounts.login("x@y.com", Role::Doctor).await.unwrap();
        assert_eq!(session.require_doctor().unwrap().specialization, Specialization::Cardiology);
    }

    #[tokio::test]
    async fn should_reject_duplicate_email_within_role_only() {
        let accounts = service();
        accounts.register_doctor(doctor("same@x.test")).await.unwrap();
        let again = accounts.register_doctor(doctor("same@x.test")).await;
        assert!(matches!(again, Err(CareError::AlreadyExists(_))));

        // The same address may still register as a patient.
        accounts.register_patient(patient("same@x.test")).await.unwrap();
    }

    #[tokio::test]
    async fn should_require_fields_on_registration_and_login() {
        let accounts = service();
        let mut missing = doctor("bob@x.test");
        missing.specialization = None;
        assert!(matches!(
            accounts.register_doctor(missing).await,
            Err(CareError::MissingField("specialization"))
        ));
        assert!(matches!(accounts.login("  ", Role::Doctor).await, Err(CareError::MissingField("email"))));
    }

    #[tokio::test]
    async fn should_clear_session_on_logout() {
        let accounts = service();
        accounts.register_patient(patient("alice@x.test")).await.unwrap();
        accounts.logout().await.unwrap();
        assert!(accounts.current_session().await.unwrap().is_none());
        assert!(matches!(accounts.require_session().await, Err(CareError::PermissionDenied(_))));
    }
}
