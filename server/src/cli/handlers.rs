// server/src/cli/handlers.rs

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use lib::{AccessibleRecord, AuthorizationSummary, AuthorizationUpdate, Database};
use log::debug;
use models::{Account, DoctorRegistration, MedicalRecord, NewMedicalRecord, PatientRegistration, Role};
use security::{AccessLabel, Session, ViewOnlyGuard, ViewerEvent};

use crate::cli::commands::Commands;
use crate::cli::payload::{decode_data_url, encode_data_url, mime_from_extension};

/// Runs one command against `db`, writing human readable output to `out`.
pub async fn handle_command<W: Write>(db: &Database, command: Commands, out: &mut W) -> Result<()> {
    debug!("Handling {:?}", command);
    match command {
        Commands::RegisterDoctor {
            name,
            email,
            specialization,
            license_number,
            hospital,
            phone,
            experience,
        } => {
            let session = db
                .accounts()
                .register_doctor(DoctorRegistration {
                    name,
                    email,
                    specialization: Some(specialization),
                    license_number,
                    hospital,
                    phone,
                    experience,
                })
                .await?;
            writeln!(out, "Registered doctor {} ({}). You are now logged in.", session.user().name, session.user_id())?;
        }
        Commands::RegisterPatient {
            name,
            email,
            date_of_birth,
            phone,
            address,
            blood_group,
        } => {
            let session = db
                .accounts()
                .register_patient(PatientRegistration {
                    name,
                    email,
                    date_of_birth: Some(date_of_birth),
                    phone,
                    address,
                    blood_group,
                })
                .await?;
            writeln!(out, "Registered patient {} ({}). You are now logged in.", session.user().name, session.user_id())?;
        }
        Commands::Login { email, role } => {
            let session = db.accounts().login(&email, role).await?;
            writeln!(out, "Logged in as {} ({}).", session.user().name, session.role())?;
        }
        Commands::Logout => {
            db.accounts().logout().await?;
            writeln!(out, "Logged out.")?;
        }
        Commands::Whoami => match db.accounts().current_session().await? {
            Some(session) => display_session(&session, out)?,
            None => writeln!(out, "Not logged in.")?,
        },
        Commands::Upload {
            file,
            description,
            file_type,
        } => {
            let session = db.accounts().require_session().await?;
            let upload = read_upload(&file, description, file_type)?;
            let record = db.records().create_record(&session, upload).await?;
            writeln!(out, "Uploaded {} as record {}.", record.file_name, record.id)?;
        }
        Commands::Records => {
            let session = db.accounts().require_session().await?;
            match session.role() {
                Role::Patient => {
                    let records = db.records().list_mine(&session).await?;
                    display_own_records(&records, out)?;
                }
                Role::Doctor => {
                    let records = db.records().list_accessible(&session).await?;
                    display_shared_records(&records, out)?;
                }
            }
        }
        Commands::View { id, save } => {
            let session = db.accounts().require_session().await?;
            let view = db.records().view_record(&session, &id).await?;
            if save.is_some()
                && session.role() == Role::Doctor
                && ViewOnlyGuard.should_suppress(&ViewerEvent::Download)
            {
                bail!("Saving is disabled for shared records; only the owning patient can save {}", id);
            }
            let record = &view.record;
            writeln!(out, "{:<16} {}", "Record", record.id)?;
            writeln!(out, "{:<16} {}", "File", record.file_name)?;
            writeln!(out, "{:<16} {} ({:?})", "Type", record.file_type, view.kind)?;
            writeln!(out, "{:<16} {}", "Uploaded", record.upload_date.to_rfc3339())?;
            writeln!(out, "{:<16} {}", "Description", record.description)?;
            writeln!(out, "{:<16} {}", "Patient", view.patient.name)?;
            if !view.labels.is_empty() {
                writeln!(out, "{:<16} {}", "Access", join_labels(&view.labels))?;
            }
            if let Some(path) = save {
                let (_, bytes) = decode_data_url(&record.file_data)
                    .ok_or_else(|| anyhow!("record {} does not hold a base64 data URL", record.id))?;
                fs::write(&path, &bytes).with_context(|| format!("Failed to write {:?}", path))?;
                writeln!(out, "Saved {} bytes to {}.", bytes.len(), path.display())?;
            }
            writeln!(out, "View only: this copy is for viewing and is not protected in any way.")?;
        }
        Commands::Grant {
            id,
            doctors,
            specializations,
        } => {
            let session = db.accounts().require_session().await?;
            let record = db
                .records()
                .update_authorization(&session, &id, AuthorizationUpdate::new(doctors, specializations))
                .await?;
            let summary = AuthorizationSummary::from(&record);
            writeln!(
                out,
                "Record {} is shared with {} doctors and {} specializations.",
                record.id, summary.doctors, summary.specializations
            )?;
        }
        Commands::Delete { id } => {
            let session = db.accounts().require_session().await?;
            if db.records().delete_record(&session, &id).await? {
                writeln!(out, "Deleted record {}.", id)?;
            } else {
                writeln!(out, "No record with id {}.", id)?;
            }
        }
        Commands::Doctors => {
            let doctors = db.records().list_doctors().await?;
            writeln!(out, "{:<42} {:<24} {:<18} {}", "ID", "Name", "Specialization", "Hospital")?;
            writeln!(out, "{:-<42} {:-<24} {:-<18} {:-<20}", "", "", "", "")?;
            for doctor in doctors {
                writeln!(
                    out,
                    "{:<42} {:<24} {:<18} {}",
                    doctor.id().as_str(),
                    doctor.user.name,
                    doctor.specialization.as_str(),
                    doctor.hospital.as_deref().unwrap_or("-")
                )?;
            }
        }
        Commands::Specializations => {
            writeln!(out, "{:<18} {}", "Specialization", "Doctors")?;
            writeln!(out, "{:-<18} {:-<7}", "", "")?;
            for (specialization, count) in db.records().specialization_roster().await? {
                writeln!(out, "{:<18} {}", specialization.as_str(), count)?;
            }
        }
    }
    Ok(())
}

fn read_upload(path: &Path, description: String, file_type: Option<String>) -> Result<NewMedicalRecord> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let file_name = match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => name.to_string(),
        None => bail!("{:?} does not name a file", path),
    };
    let file_type = file_type.unwrap_or_else(|| mime_from_extension(path).to_string());
    Ok(NewMedicalRecord {
        file_data: encode_data_url(&file_type, &bytes),
        file_name,
        file_type,
        description,
    })
}

fn display_session<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let user = session.user();
    writeln!(out, "{:<16} {}", "Name", user.name)?;
    writeln!(out, "{:<16} {}", "Email", user.email)?;
    writeln!(out, "{:<16} {}", "Role", user.role)?;
    writeln!(out, "{:<16} {}", "ID", user.id)?;
    match session.account() {
        Account::Doctor(doctor) => {
            writeln!(out, "{:<16} {}", "Specialization", doctor.specialization)?;
            writeln!(out, "{:<16} {}", "License", doctor.license_number)?;
        }
        Account::Patient(patient) => {
            writeln!(out, "{:<16} {}", "Date of birth", patient.date_of_birth)?;
            if let Some(blood_group) = patient.blood_group {
                writeln!(out, "{:<16} {}", "Blood group", blood_group)?;
            }
        }
    }
    Ok(())
}

fn display_own_records<W: Write>(records: &[MedicalRecord], out: &mut W) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No records uploaded yet.")?;
        return Ok(());
    }
    writeln!(out, "{:<40} {:<24} {:<12} {}", "ID", "File", "Uploaded", "Shared with")?;
    writeln!(out, "{:-<40} {:-<24} {:-<12} {:-<30}", "", "", "", "")?;
    for record in records {
        let summary = AuthorizationSummary::from(record);
        writeln!(
            out,
            "{:<40} {:<24} {:<12} {} doctors, {} specializations",
            record.id.as_str(),
            record.file_name,
            record.upload_date.format("%Y-%m-%d").to_string(),
            summary.doctors,
            summary.specializations
        )?;
    }
    Ok(())
}

fn display_shared_records<W: Write>(records: &[AccessibleRecord], out: &mut W) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No records have been shared with you.")?;
        return Ok(());
    }
    writeln!(out, "{:<40} {:<24} {:<24} {:<12} {}", "ID", "Patient", "File", "Uploaded", "Access")?;
    writeln!(out, "{:-<40} {:-<24} {:-<24} {:-<12} {:-<30}", "", "", "", "", "")?;
    for AccessibleRecord { record, patient, labels } in records {
        writeln!(
            out,
            "{:<40} {:<24} {:<24} {:<12} {}",
            record.id.as_str(),
            patient.name,
            record.file_name,
            record.upload_date.format("%Y-%m-%d").to_string(),
            join_labels(labels)
        )?;
    }
    Ok(())
}

fn join_labels(labels: &[AccessLabel]) -> String {
    labels.iter().map(AccessLabel::as_str).collect::<Vec<_>>().join(", ")
}
