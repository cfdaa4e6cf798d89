//! Events delivered to the garage by the owner screens.
//!
//! The add/edit form returns `{carData, isEditMode}` through navigation and
//! the list screen confirms deletes. Expressing both as events lets the
//! mobile layer replay them through a single entry point.

use crate::{CarDraft, CarId};
use serde::{Deserialize, Serialize};

/// A change requested by the owner UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GarageEvent {
    /// Form submission: create when `is_edit_mode` is false, edit otherwise
    Upsert {
        #[serde(rename = "carData")]
        car_data: CarDraft,
        #[serde(rename = "isEditMode", default)]
        is_edit_mode: bool,
    },
    /// Confirmed delete
    Remove { id: CarId },
    /// A photo picked for an existing car
    AddPhoto { id: CarId, uri: String },
}

impl GarageEvent {
    /// Create-form submission.
    pub fn create(car_data: CarDraft) -> Self {
        GarageEvent::Upsert {
            car_data,
            is_edit_mode: false,
        }
    }

    /// Edit-form submission.
    pub fn edit(car_data: CarDraft) -> Self {
        GarageEvent::Upsert {
            car_data,
            is_edit_mode: true,
        }
    }

    pub fn remove(id: impl Into<CarId>) -> Self {
        GarageEvent::Remove { id: id.into() }
    }

    pub fn add_photo(id: impl Into<CarId>, uri: impl Into<String>) -> Self {
        GarageEvent::AddPhoto {
            id: id.into(),
            uri: uri.into(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GarageEvent::Upsert {
                is_edit_mode: true, ..
            } => "edit",
            GarageEvent::Upsert { .. } => "create",
            GarageEvent::Remove { .. } => "remove",
            GarageEvent::AddPhoto { .. } => "addPhoto",
        }
    }

    /// The car this event targets, when known up front.
    pub fn car_id(&self) -> Option<&CarId> {
        match self {
            GarageEvent::Upsert {
                car_data,
                is_edit_mode: true,
            } => car_data.id.as_ref(),
            GarageEvent::Upsert { .. } => None,
            GarageEvent::Remove { id } | GarageEvent::AddPhoto { id, .. } => Some(id),
        }
    }
}
