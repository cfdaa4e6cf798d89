//! Error types for the Carhire engine.

use crate::{validate::ValidationErrors, CarId};
use thiserror::Error;

/// All possible errors from the Carhire engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    // Garage errors
    #[error("car not found: {0}")]
    NotFound(CarId),

    #[error("edit requested without a car id")]
    MissingId,

    #[error("no timestamp ids left to issue (last issued: {last_issued})")]
    IdSpaceExhausted { last_issued: u64 },

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("unsupported snapshot format version: {found} (max supported: {supported})")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
