//! Validation of owned cars before they enter the garage.
//!
//! Validation runs on the fully merged record, so an edit that only carries a
//! new brand is still checked against the stored model, year and plate.

use crate::{car::MAX_PHOTOS, error::Result, OwnedCar};
use serde::{Deserialize, Serialize};

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears on the wire (camelCase)
    pub field: String,
    /// User-facing message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found for one record, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message for a given field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: Option<&String>) -> bool {
    value.map_or(true, |v| is_blank(v))
}

/// Validate a car record.
///
/// Returns [`crate::Error::Validation`] listing every offending field.
pub fn validate(car: &OwnedCar) -> Result<()> {
    let mut errors = ValidationErrors::new();

    if is_blank(&car.brand) {
        errors.push("brand", "Car brand is required");
    }
    if is_blank(&car.model) {
        errors.push("model", "Car model is required");
    }
    if is_blank(&car.year) {
        errors.push("year", "Car year is required");
    }
    if is_blank(&car.license_plate) {
        errors.push("licensePlate", "License plate is required");
    }
    if car.photos.len() > MAX_PHOTOS {
        errors.push("photos", "You can upload a maximum of 6 photos per car");
    }
    if car.availability.requires_driver() {
        if is_blank_opt(car.driver_name.as_ref()) {
            errors.push("driverName", "Driver name is required");
        }
        if is_blank_opt(car.driver_number.as_ref()) {
            errors.push("driverNumber", "Driver number is required");
        }
    }

    errors.into_result()
}
