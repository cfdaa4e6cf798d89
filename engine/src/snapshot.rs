//! Snapshot types for handing garage state across the app boundary.
//!
//! The mobile layer keeps a snapshot when an owner screen unmounts and
//! restores it when the screen comes back. Snapshots preserve car order.

use crate::{error::Result, validate::validate, Error, IdGenerator, OwnedCar};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of a garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// Id generator state, so restored garages never reissue an id
    pub ids: IdGenerator,
    /// Cars in insertion order
    pub cars: Vec<OwnedCar>,
}

impl GarageSnapshot {
    /// Create a snapshot at the current format version.
    pub fn new(ids: IdGenerator, cars: Vec<OwnedCar>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            ids,
            cars,
        }
    }

    /// Number of cars in the snapshot.
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Check that ids are unique and every car is valid.
    pub fn validate(&self) -> Result<()> {
        if self.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: self.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for car in &self.cars {
            if !seen.insert(car.id.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate car id: {}",
                    car.id
                )));
            }
            if car.id.trim().is_empty() {
                return Err(Error::InvalidSnapshot("car with empty id".into()));
            }
            validate(car).map_err(|e| Error::InvalidSnapshot(format!("car {}: {}", car.id, e)))?;
        }

        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: snapshot.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }

        Ok(snapshot)
    }
}
