//! # Carhire Engine
//!
//! The logic core of the Carhire car-rental app.
//!
//! The mobile screens own rendering, navigation and network calls. This crate
//! owns the two pieces of real decision logic behind them: filtering the
//! rental inventory on the browsing screen, and reconciling the owner's car
//! collection as add/edit/delete forms return.
//!
//! ## Design Principles
//!
//! - **No IO**: time is passed in as millisecond timestamps
//! - **Deterministic**: same inputs always produce the same outputs
//! - **Atomic writes**: a rejected change leaves the garage untouched
//!
//! ## Filtering
//!
//! [`filter`] maps an inventory of [`CarListing`]s and a [`FilterCriteria`]
//! to the visible listings, in inventory order. Selected rating thresholds
//! combine with OR by default ([`RatingMatch::Any`]).
//!
//! ## Garage
//!
//! [`Garage`] holds the owner's [`OwnedCar`]s in insertion order:
//! - [`Garage::upsert`] creates (fresh id, appended) or edits (shallow merge,
//!   position kept)
//! - [`Garage::remove`] deletes by id, a no-op for unknown ids
//! - [`Garage::add_photo`] enforces the six-photo ceiling
//! - [`Garage::apply`] takes the same changes as [`GarageEvent`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use carhire_engine::{filter, CarDraft, CarListing, FilterCriteria, Garage};
//!
//! // Browse
//! let inventory = vec![
//!     CarListing::new("1", "John Doe", "SUV", 4.5, "With Driver"),
//!     CarListing::new("2", "Jane Smith", "Sedan", 4.2, "Self"),
//! ];
//! let criteria = FilterCriteria::new().with_min_rating("4.0").with_min_rating("4.5");
//! assert_eq!(filter(&inventory, &criteria).len(), 2);
//!
//! // Manage owned cars
//! let mut garage = Garage::new();
//! let created = garage
//!     .upsert(CarDraft::new("Kia", "Rio", "2022", "K1"), false, 1706745600000)
//!     .unwrap();
//! garage
//!     .upsert(CarDraft::edit(created.id.clone()).model("Stonic"), true, 1706745601000)
//!     .unwrap();
//! assert_eq!(garage.get(&created.id).unwrap().model, "Stonic");
//! ```
//!
//! ## FFI
//!
//! The [`ffi`] module exposes C-compatible functions for the mobile layer.
//! All data is exchanged as JSON strings.

pub mod car;
pub mod error;
pub mod event;
pub mod ffi;
pub mod filter;
pub mod garage;
pub mod ids;
pub mod listing;
pub mod snapshot;
pub mod validate;

// Re-export main types at crate root
pub use car::{Availability, CarDraft, OwnedCar, MAX_PHOTOS};
pub use error::Error;
pub use event::GarageEvent;
pub use filter::{filter, filter_owned, FilterCriteria, FilterOptions, ParseWarning, RatingMatch};
pub use garage::{EventOutcome, Garage, UpsertOutcome};
pub use ids::{IdGenerator, IdStrategy};
pub use listing::CarListing;
pub use snapshot::{GarageSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use validate::{validate, FieldError, ValidationErrors};

/// Type aliases for clarity
pub type CarId = String;
pub type ListingId = String;
pub type Timestamp = u64;
