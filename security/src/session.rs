// security/src/session.rs

use models::{Account, CareError, CareResult, Doctor, Identifier, Patient, Role, User};

/// The logged-in user, passed explicitly to every record operation.
///
/// A session is a convenience for picking the right dashboard; holding one
/// proves nothing about who is at the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    account: Account,
}

impl Session {
    pub fn new(account: Account) -> Self {
        Session { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }

    pub fn user(&self) -> &User {
        self.account.user()
    }

    pub fn user_id(&self) -> &Identifier {
        self.account.id()
    }

    pub fn role(&self) -> Role {
        self.account.role()
    }

    /// The doctor profile, or `PermissionDenied` for a patient session.
    pub fn require_doctor(&self) -> CareResult<&Doctor> {
        match &self.account {
            Account::Doctor(doctor) => Ok(doctor),
            Account::Patient(patient) => Err(CareError::PermissionDenied(format!(
                "{} is logged in as a patient; this action needs a doctor",
                patient.user.email
            ))),
        }
    }

    /// The patient profile, or `PermissionDenied` for a doctor session.
    pub fn require_patient(&self) -> CareResult<&Patient> {
        match &self.account {
            Account::Patient(patient) => Ok(patient),
            Account::Doctor(doctor) => Err(CareError::PermissionDenied(format!(
                "{} is logged in as a doctor; this action needs a patient",
                doctor.user.email
            ))),
        }
    }
}

impl From<Account> for Session {
    fn from(account: Account) -> Self {
        Session::new(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::PatientRegistration;

    #[test]
    fn should_gate_role_specific_actions() {
        let patient = Patient::from_registration(PatientRegistration {
            name: "Alice".to_string(),
            email: "alice@x.test".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            ..Default::default()
        })
        .unwrap();
        let session = Session::from(Account::from(patient));

        assert_eq!(session.role(), Role::Patient);
        assert!(session.require_patient().is_ok());
        assert!(matches!(session.require_doctor(), Err(CareError::PermissionDenied(_))));
    }
}
