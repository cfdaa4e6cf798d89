//! Garage - the owner's in-memory car collection.
//!
//! The garage keeps cars in insertion order, keyed by id. Every write either
//! applies completely or leaves the garage untouched.

use crate::{
    car::MAX_PHOTOS,
    error::Result,
    snapshot::GarageSnapshot,
    validate::{validate, ValidationErrors},
    CarDraft, CarId, Error, GarageEvent, IdGenerator, OwnedCar, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOutcome {
    /// Id of the created or edited car
    pub id: CarId,
    /// Whether a new car was appended
    pub created: bool,
    /// Index of the car in the garage
    pub position: usize,
}

/// Result of applying a [`GarageEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventOutcome {
    #[serde(rename_all = "camelCase")]
    Upserted {
        id: CarId,
        created: bool,
        position: usize,
    },
    Removed {
        id: CarId,
        removed: bool,
    },
    #[serde(rename_all = "camelCase")]
    PhotoAdded {
        id: CarId,
        photo_count: usize,
    },
}

impl From<UpsertOutcome> for EventOutcome {
    fn from(outcome: UpsertOutcome) -> Self {
        EventOutcome::Upserted {
            id: outcome.id,
            created: outcome.created,
            position: outcome.position,
        }
    }
}

/// The owner's cars plus the id source for new ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Garage {
    ids: IdGenerator,
    cars: Vec<OwnedCar>,
}

impl Garage {
    /// Create an empty garage with timestamp ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty garage with a specific id generator.
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            ids,
            cars: Vec::new(),
        }
    }

    /// Seed a garage with existing cars, e.g. from a profile fetch.
    ///
    /// Fails if ids repeat or any car is invalid.
    pub fn from_cars(cars: Vec<OwnedCar>) -> Result<Self> {
        let mut garage = Self::new();
        garage.import_state(GarageSnapshot::new(IdGenerator::new(), cars))?;
        Ok(garage)
    }

    /// Get the id generator.
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// All cars in insertion order.
    pub fn cars(&self) -> &[OwnedCar] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Get a car by id.
    pub fn get(&self, id: &str) -> Option<&OwnedCar> {
        self.cars.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Index of a car by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.cars.iter().position(|c| c.id == id)
    }

    /// Apply a form submission.
    ///
    /// In edit mode the draft must name an existing car; its present fields
    /// are merged over the stored record in place. Otherwise any id in the
    /// draft is ignored, a fresh id is generated and the car is appended.
    pub fn upsert(
        &mut self,
        draft: CarDraft,
        is_edit_mode: bool,
        timestamp: Timestamp,
    ) -> Result<UpsertOutcome> {
        if is_edit_mode {
            self.apply_edit(draft)
        } else {
            self.apply_create(draft, timestamp)
        }
    }

    fn apply_create(&mut self, draft: CarDraft, timestamp: Timestamp) -> Result<UpsertOutcome> {
        let mut car = OwnedCar::from_draft(CarId::new(), draft);
        validate(&car)?;

        // Only issue an id once the car is known to be valid
        let cars = &self.cars;
        let mut ids = self.ids.clone();
        car.id = ids.next_unused(timestamp, |id| cars.iter().any(|c| c.id == id))?;
        self.ids = ids;

        tracing::debug!(id = %car.id, brand = %car.brand, "car created");

        let outcome = UpsertOutcome {
            id: car.id.clone(),
            created: true,
            position: self.cars.len(),
        };
        self.cars.push(car);
        Ok(outcome)
    }

    fn apply_edit(&mut self, draft: CarDraft) -> Result<UpsertOutcome> {
        let id = draft.id.clone().ok_or(Error::MissingId)?;
        let position = self.position(&id).ok_or_else(|| Error::NotFound(id.clone()))?;

        let merged = self.cars[position].merge(draft);
        validate(&merged)?;

        tracing::debug!(id = %id, position, "car edited");
        self.cars[position] = merged;

        Ok(UpsertOutcome {
            id,
            created: false,
            position,
        })
    }

    /// Remove a car by id. Removing an unknown id is a no-op.
    ///
    /// Callers confirm the delete with the user before calling this.
    pub fn remove(&mut self, id: &str) -> Option<OwnedCar> {
        let position = self.position(id)?;
        tracing::debug!(id, position, "car removed");
        Some(self.cars.remove(position))
    }

    /// Attach a picked photo to an existing car.
    ///
    /// Returns the car's new photo count. A car already holding
    /// [`MAX_PHOTOS`] photos rejects the photo.
    pub fn add_photo(&mut self, id: &str, uri: impl Into<String>) -> Result<usize> {
        let uri = uri.into();
        let position = self
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let car = &mut self.cars[position];

        let mut errors = ValidationErrors::new();
        if uri.trim().is_empty() {
            errors.push("photos", "Photo URI is required");
        }
        if car.photos.len() >= MAX_PHOTOS {
            errors.push("photos", "You can upload a maximum of 6 photos per car");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        car.photos.push(uri);
        tracing::debug!(id, photos = car.photos.len(), "photo added");
        Ok(car.photos.len())
    }

    /// Cars whose brand or model contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&OwnedCar> {
        self.cars.iter().filter(|c| c.matches_query(query)).collect()
    }

    /// Apply an event from the owner UI.
    pub fn apply(&mut self, event: GarageEvent, timestamp: Timestamp) -> Result<EventOutcome> {
        let kind = event.kind();
        let result = match event {
            GarageEvent::Upsert {
                car_data,
                is_edit_mode,
            } => self
                .upsert(car_data, is_edit_mode, timestamp)
                .map(EventOutcome::from),
            GarageEvent::Remove { id } => {
                let removed = self.remove(&id).is_some();
                Ok(EventOutcome::Removed { id, removed })
            }
            GarageEvent::AddPhoto { id, uri } => {
                self.add_photo(&id, uri)
                    .map(|photo_count| EventOutcome::PhotoAdded { id, photo_count })
            }
        };

        if let Err(e) = &result {
            tracing::warn!(event = kind, error = %e, "garage event rejected");
        }
        result
    }

    /// Export the current garage state as a snapshot.
    pub fn export_state(&self) -> GarageSnapshot {
        GarageSnapshot::new(self.ids.clone(), self.cars.clone())
    }

    /// Replace the garage state with a snapshot's state.
    ///
    /// The snapshot is validated first; on error the garage is unchanged.
    pub fn import_state(&mut self, snapshot: GarageSnapshot) -> Result<()> {
        snapshot.validate()?;

        let mut ids = snapshot.ids;
        for car in &snapshot.cars {
            ids.observe(&car.id);
        }

        tracing::debug!(cars = snapshot.cars.len(), "garage state imported");
        self.ids = ids;
        self.cars = snapshot.cars;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Availability, IdStrategy};

    const NOW: Timestamp = 1_706_745_600_000;

    fn seeded() -> Garage {
        Garage::from_cars(vec![
            OwnedCar::new("1", "Toyota", "Camry", "2021", "ABC123"),
            OwnedCar::new("2", "Honda", "Civic", "2019", "XYZ789"),
        ])
        .unwrap()
    }

    fn rio() -> CarDraft {
        CarDraft::new("Kia", "Rio", "2022", "K1")
    }

    fn validation_fields(result: Result<UpsertOutcome>) -> Vec<String> {
        match result {
            Err(Error::Validation(errors)) => {
                errors.fields().into_iter().map(String::from).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_appends_with_generated_id() {
        let mut garage = seeded();
        let outcome = garage.upsert(rio(), false, NOW).unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.id, NOW.to_string());
        assert_eq!(outcome.position, 2);

        let ids: Vec<_> = garage.cars().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", outcome.id.as_str()]);
        assert_eq!(garage.get("1").unwrap().brand, "Toyota");
    }

    #[test]
    fn create_ignores_caller_id() {
        let mut garage = seeded();
        let mut draft = rio();
        draft.id = Some("1".into());

        let outcome = garage.upsert(draft, false, NOW).unwrap();
        assert_ne!(outcome.id, "1");
        assert_eq!(garage.len(), 3);
        assert_eq!(garage.get("1").unwrap().brand, "Toyota");
    }

    #[test]
    fn rapid_creates_get_distinct_ids() {
        let mut garage = Garage::new();
        let a = garage.upsert(rio(), false, NOW).unwrap();
        let b = garage.upsert(rio(), false, NOW).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn invalid_create_leaves_ids_untouched() {
        let mut garage = Garage::new();
        let before = garage.ids().clone();

        let result = garage.upsert(CarDraft::default(), false, NOW);
        assert_eq!(
            validation_fields(result),
            vec!["brand", "model", "year", "licensePlate"]
        );
        assert!(garage.is_empty());
        assert_eq!(garage.ids(), &before);
    }

    #[test]
    fn edit_merges_in_place() {
        let mut garage = seeded();
        let outcome = garage
            .upsert(CarDraft::edit("1").brand("Toyota2"), true, NOW)
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.position, 0);

        let car = &garage.cars()[0];
        assert_eq!(car.id, "1");
        assert_eq!(car.brand, "Toyota2");
        assert_eq!(car.model, "Camry");
        assert_eq!(car.year, "2021");
        assert_eq!(car.license_plate, "ABC123");
        assert_eq!(garage.cars()[1].id, "2");
    }

    #[test]
    fn edit_unknown_id() {
        let mut garage = seeded();
        let before = garage.clone();

        let result = garage.upsert(CarDraft::edit("999").brand("Ghost"), true, NOW);
        assert_eq!(result, Err(Error::NotFound("999".into())));
        assert_eq!(garage, before);
    }

    #[test]
    fn edit_without_id() {
        let mut garage = seeded();
        let result = garage.upsert(rio(), true, NOW);
        assert_eq!(result, Err(Error::MissingId));
        assert_eq!(garage.len(), 2);
    }

    #[test]
    fn invalid_edit_is_not_applied() {
        let mut garage = seeded();
        let before = garage.clone();

        let draft = CarDraft::edit("2").availability(Availability::WithDriver);
        assert_eq!(
            validation_fields(garage.upsert(draft, true, NOW)),
            vec!["driverName", "driverNumber"]
        );
        assert_eq!(garage, before);
    }

    #[test]
    fn driver_fields_conditionally_required() {
        let mut garage = Garage::new();

        let with_driver = rio()
            .availability(Availability::WithDriver)
            .driver("", "");
        assert!(garage.upsert(with_driver, false, NOW).is_err());
        assert!(garage.is_empty());

        let car_only = rio().availability(Availability::CarOnly).driver("", "");
        let outcome = garage.upsert(car_only, false, NOW).unwrap();
        assert_eq!(garage.get(&outcome.id).unwrap().driver_name, None);
    }

    #[test]
    fn seventh_photo_rejected() {
        let mut garage = Garage::new();
        let draft = rio().photos((0..6).map(|i| format!("file:///{i}.jpg")));
        let id = garage.upsert(draft, false, NOW).unwrap().id;
        let before = garage.clone();

        let result = garage.add_photo(&id, "file:///7.jpg");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(garage, before);
    }

    #[test]
    fn seven_photo_draft_rejected() {
        let mut garage = Garage::new();
        let draft = rio().photos((0..7).map(|i| format!("file:///{i}.jpg")));
        assert_eq!(
            validation_fields(garage.upsert(draft, false, NOW)),
            vec!["photos"]
        );
    }

    #[test]
    fn add_photo_appends() {
        let mut garage = seeded();
        assert_eq!(garage.add_photo("1", "file:///front.jpg"), Ok(1));
        assert_eq!(garage.add_photo("1", "file:///back.jpg"), Ok(2));
        assert_eq!(
            garage.get("1").unwrap().photos,
            vec!["file:///front.jpg", "file:///back.jpg"]
        );
        assert_eq!(
            garage.add_photo("404", "file:///x.jpg"),
            Err(Error::NotFound("404".into()))
        );
        assert!(garage.add_photo("1", "  ").is_err());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut garage = seeded();
        assert!(garage.remove("nonexistent").is_none());
        assert_eq!(garage.len(), 2);

        assert_eq!(garage.remove("1").map(|c| c.id), Some("1".into()));
        let after_first = garage.clone();
        assert!(garage.remove("1").is_none());
        assert_eq!(garage, after_first);
    }

    #[test]
    fn search_brand_or_model() {
        let garage = seeded();
        let found: Vec<_> = garage.search("CIV").iter().map(|c| c.id.clone()).collect();
        assert_eq!(found, vec!["2"]);
        assert_eq!(garage.search("o").len(), 2);
        assert!(garage.search("tesla").is_empty());
    }

    #[test]
    fn apply_events() {
        let mut garage = seeded();

        let created = garage.apply(GarageEvent::create(rio()), NOW).unwrap();
        let new_id = match created {
            EventOutcome::Upserted { id, created, .. } => {
                assert!(created);
                id
            }
            other => panic!("unexpected outcome {:?}", other),
        };

        let photo = garage
            .apply(GarageEvent::add_photo(new_id.clone(), "file:///rio.jpg"), NOW)
            .unwrap();
        assert_eq!(
            photo,
            EventOutcome::PhotoAdded {
                id: new_id.clone(),
                photo_count: 1
            }
        );

        let removed = garage.apply(GarageEvent::remove("2"), NOW).unwrap();
        assert_eq!(
            removed,
            EventOutcome::Removed {
                id: "2".into(),
                removed: true
            }
        );

        let missing = garage.apply(GarageEvent::edit(CarDraft::edit("2")), NOW);
        assert_eq!(missing, Err(Error::NotFound("2".into())));

        let ids: Vec<_> = garage.cars().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["1".to_string(), new_id]);
    }

    #[test]
    fn from_cars_rejects_duplicates() {
        let result = Garage::from_cars(vec![
            OwnedCar::new("1", "Toyota", "Camry", "2021", "ABC123"),
            OwnedCar::new("1", "Honda", "Civic", "2019", "XYZ789"),
        ]);
        assert!(matches!(result, Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn export_import_roundtrip() {
        let mut garage = seeded();
        garage.upsert(rio(), false, NOW).unwrap();

        let snapshot = garage.export_state();
        let mut restored = Garage::new();
        restored.import_state(snapshot).unwrap();

        assert_eq!(restored, garage);
        // Ids keep advancing after a restore
        let next = restored.upsert(rio(), false, NOW).unwrap();
        assert_eq!(next.id, (NOW + 1).to_string());
    }

    #[test]
    fn seeded_ids_are_never_reissued() {
        let mut garage = Garage::from_cars(vec![OwnedCar::new(
            "5000", "Toyota", "Camry", "2021", "ABC123",
        )])
        .unwrap();
        let outcome = garage.upsert(rio(), false, 5000).unwrap();
        assert_eq!(outcome.id, "5001");
    }

    #[test]
    fn create_fails_cleanly_when_ids_run_out() {
        let mut garage = Garage::from_cars(vec![OwnedCar::new(
            u64::MAX.to_string(),
            "Toyota",
            "Camry",
            "2021",
            "ABC123",
        )])
        .unwrap();
        let before = garage.clone();

        let result = garage.upsert(rio(), false, 1000);
        assert_eq!(
            result,
            Err(Error::IdSpaceExhausted {
                last_issued: u64::MAX
            })
        );
        assert_eq!(garage, before);

        // Edits and uuid ids still work
        garage
            .upsert(CarDraft::edit(u64::MAX.to_string()).model("Yaris"), true, 1000)
            .unwrap();
        let mut snapshot = garage.export_state();
        snapshot.ids = IdGenerator::with_strategy(IdStrategy::Uuid);
        garage.import_state(snapshot).unwrap();
        assert!(garage.upsert(rio(), false, 1000).is_ok());
    }

    #[test]
    fn failed_id_search_keeps_generator_state() {
        let mut garage = Garage::from_cars(vec![
            OwnedCar::new((u64::MAX - 1).to_string(), "Toyota", "Camry", "2021", "A1"),
        ])
        .unwrap();
        // Taken by an id the generator never saw
        garage.cars.push(OwnedCar::new(u64::MAX.to_string(), "Honda", "Civic", "2019", "B2"));
        let ids_before = garage.ids().clone();

        assert!(garage.upsert(rio(), false, 1000).is_err());
        assert_eq!(garage.ids(), &ids_before);
        assert_eq!(garage.len(), 2);
    }
}
