//! Owner-side car records and the form payloads that create or edit them.

use crate::CarId;
use serde::{Deserialize, Serialize};

/// Maximum number of photos a single owned car may carry.
pub const MAX_PHOTOS: usize = 6;

/// How an owned car is offered to renters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Availability {
    /// The renter drives the car themselves
    #[default]
    #[serde(rename = "Car Only")]
    CarOnly,
    /// The car comes with the owner's driver
    #[serde(rename = "With Driver")]
    WithDriver,
    /// Either option is offered
    Both,
}

impl Availability {
    /// Whether driver name and number must be supplied.
    pub fn requires_driver(self) -> bool {
        matches!(self, Availability::WithDriver | Availability::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Availability::CarOnly => "Car Only",
            Availability::WithDriver => "With Driver",
            Availability::Both => "Both",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A car registered by an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCar {
    /// Unique identifier within the garage
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub license_plate: String,
    /// Image URIs, at most [`MAX_PHOTOS`]
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_number: Option<String>,
}

impl OwnedCar {
    /// Create a self-drive car with no photos.
    pub fn new(
        id: impl Into<CarId>,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            year: year.into(),
            license_plate: license_plate.into(),
            photos: Vec::new(),
            availability: Availability::CarOnly,
            driver_name: None,
            driver_number: None,
        }
    }

    /// Builder-style method to offer the car with a driver.
    pub fn with_driver(
        mut self,
        availability: Availability,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        self.availability = availability;
        self.driver_name = Some(name.into());
        self.driver_number = Some(number.into());
        self
    }

    /// Builder-style method to attach photos.
    pub fn with_photos<I, S>(mut self, photos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos = photos.into_iter().map(Into::into).collect();
        self
    }

    /// Build a new record from a create-form draft.
    ///
    /// Missing required fields become empty strings so validation can report
    /// them per field.
    pub fn from_draft(id: CarId, draft: CarDraft) -> Self {
        let mut car = Self {
            id,
            brand: draft.brand.unwrap_or_default(),
            model: draft.model.unwrap_or_default(),
            year: draft.year.unwrap_or_default(),
            license_plate: draft.license_plate.unwrap_or_default(),
            photos: draft.photos.unwrap_or_default(),
            availability: draft.availability.unwrap_or_default(),
            driver_name: draft.driver_name,
            driver_number: draft.driver_number,
        };
        car.normalize();
        car
    }

    /// Shallow-merge a draft over this record. Fields present in the draft
    /// win; absent fields keep their current value. The id never changes.
    pub fn merge(&self, draft: CarDraft) -> Self {
        let mut car = Self {
            id: self.id.clone(),
            brand: draft.brand.unwrap_or_else(|| self.brand.clone()),
            model: draft.model.unwrap_or_else(|| self.model.clone()),
            year: draft.year.unwrap_or_else(|| self.year.clone()),
            license_plate: draft
                .license_plate
                .unwrap_or_else(|| self.license_plate.clone()),
            photos: draft.photos.unwrap_or_else(|| self.photos.clone()),
            availability: draft.availability.unwrap_or(self.availability),
            driver_name: draft.driver_name.or_else(|| self.driver_name.clone()),
            driver_number: draft.driver_number.or_else(|| self.driver_number.clone()),
        };
        car.normalize();
        car
    }

    /// Drop driver details when the car is offered without a driver.
    fn normalize(&mut self) {
        if !self.availability.requires_driver() {
            self.driver_name = None;
            self.driver_number = None;
        }
    }

    /// Whether brand or model contains the query, ignoring case.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.brand.to_lowercase().contains(&query) || self.model.to_lowercase().contains(&query)
    }
}

/// Payload returned by the add/edit car form.
///
/// Every field is optional: on edit, absent fields are preserved from the
/// stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_number: Option<String>,
}

impl CarDraft {
    /// A draft filled with the four required identity fields.
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            brand: Some(brand.into()),
            model: Some(model.into()),
            year: Some(year.into()),
            license_plate: Some(license_plate.into()),
            ..Self::default()
        }
    }

    /// An edit draft targeting an existing car.
    pub fn edit(id: impl Into<CarId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn photos<I, S>(mut self, photos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos = Some(photos.into_iter().map(Into::into).collect());
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn driver(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.driver_name = Some(name.into());
        self.driver_number = Some(number.into());
        self
    }
}

impl From<OwnedCar> for CarDraft {
    fn from(car: OwnedCar) -> Self {
        Self {
            id: Some(car.id),
            brand: Some(car.brand),
            model: Some(car.model),
            year: Some(car.year),
            license_plate: Some(car.license_plate),
            photos: Some(car.photos),
            availability: Some(car.availability),
            driver_name: car.driver_name,
            driver_number: car.driver_number,
        }
    }
}
