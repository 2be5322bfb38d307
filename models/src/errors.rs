// models/src/errors.rs

use std::io;
pub use thiserror::Error;

use crate::medical::Role;

#[derive(Debug, Error)]
pub enum CareError {
    #[error("User not found. Please register first ({role} with email {email})")]
    UserNotFound { email: String, role: Role },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid data provided: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[cfg(feature = "sled-errors")]
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

impl From<serde_json::Error> for CareError {
    fn from(err: serde_json::Error) -> Self {
        CareError::SerializationError(format!("JSON processing error: {}", err))
    }
}

/// A validation error raised while building entities from user input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An identifier is empty or longer than 255 bytes.
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    /// The value does not name a known role.
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    /// The value is not one of the fixed specializations.
    #[error("unknown specialization '{0}'")]
    UnknownSpecialization(String),
    /// The value is not one of the fixed blood groups.
    #[error("unknown blood group '{0}'")]
    UnknownBloodGroup(String),
}

/// A type alias for a `Result` that returns a `CareError` on failure.
pub type CareResult<T> = Result<T, CareError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
