// server/src/cli/commands.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use models::{BloodGroup, Identifier, Role, Specialization};

#[derive(Parser, Debug)]
#[command(name = "caresync")]
#[command(version = "0.1.0")]
#[command(about = "Patient-controlled medical record sharing")]
pub struct CliArgs {
    /// YAML storage configuration. Defaults to ./caresync.yaml when present.
    #[arg(long, short = 'c', global = true, env = "CARESYNC_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Register a doctor and log in
    RegisterDoctor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        specialization: Specialization,
        #[arg(long)]
        license_number: String,
        #[arg(long)]
        hospital: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Years of experience
        #[arg(long)]
        experience: Option<u32>,
    },
    /// Register a patient and log in
    RegisterPatient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Date of birth as YYYY-MM-DD
        #[arg(long)]
        date_of_birth: NaiveDate,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        blood_group: Option<BloodGroup>,
    },
    /// Log in by email within one role
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Upload a file as a new record (patients)
    Upload {
        #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long, short = 'd')]
        description: String,
        /// Overrides the MIME type guessed from the extension
        #[arg(long)]
        file_type: Option<String>,
    },
    /// List your records (patients) or records shared with you (doctors)
    Records,
    /// Show one record
    View {
        #[arg(value_name = "RECORD_ID")]
        id: Identifier,
        /// Write the decoded payload to this path (owning patient only)
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        save: Option<PathBuf>,
    },
    /// Replace who may view a record. Omitted lists become empty.
    Grant {
        #[arg(value_name = "RECORD_ID")]
        id: Identifier,
        #[arg(long = "doctor", value_name = "DOCTOR_ID")]
        doctors: Vec<String>,
        /// Exact specialization name, e.g. "General Practice". Other
        /// spellings are stored as given and match no doctor.
        #[arg(long = "specialization", value_name = "SPECIALIZATION")]
        specializations: Vec<String>,
    },
    /// Permanently delete one of your records
    Delete {
        #[arg(value_name = "RECORD_ID")]
        id: Identifier,
    },
    /// List registered doctors
    Doctors,
    /// Show the specializations and how many doctors hold each
    Specializations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_have_valid_command_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn should_parse_grant_with_repeated_flags() {
        let args = CliArgs::try_parse_from([
            "caresync",
            "grant",
            "record-1",
            "--doctor",
            "doctor-a",
            "--doctor",
            "doctor-b",
            "--specialization",
            "Cardiology",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Commands::Grant {
                id: Identifier::new("record-1".to_string()).unwrap(),
                doctors: vec!["doctor-a".to_string(), "doctor-b".to_string()],
                specializations: vec!["Cardiology".to_string()],
            }
        );
    }

    #[test]
    fn should_parse_typed_registration_fields() {
        let args = CliArgs::try_parse_from([
            "caresync",
            "--config",
            "custom.yaml",
            "register-doctor",
            "--name",
            "Bob",
            "--email",
            "bob@x.test",
            "--specialization",
            "general-practice",
            "--license-number",
            "L-1",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
        match args.command {
            Commands::RegisterDoctor { specialization, experience, .. } => {
                assert_eq!(specialization, Specialization::GeneralPractice);
                assert_eq!(experience, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(CliArgs::try_parse_from(["caresync", "login", "--email", "a@b", "--role", "nurse"]).is_err());
    }
}
