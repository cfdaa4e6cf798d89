//! Subcommand implementations.

use crate::config::Config;
use crate::error::{CliError, Result};
use carhire_engine::{
    filter, CarListing, Error, EventOutcome, FilterOptions, Garage, GarageEvent, GarageSnapshot,
    IdGenerator, OwnedCar, ValidationErrors,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

const BUNDLED_INVENTORY: &str = include_str!("../data/cars.json");
const BUNDLED_GARAGE: &str = include_str!("../data/garage.json");

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configured inventory, falling back to the bundled sample.
pub fn load_inventory(path: Option<&Path>) -> Result<Vec<CarListing>> {
    let json = match path {
        Some(path) => read(path)?,
        None => BUNDLED_INVENTORY.to_string(),
    };
    Ok(serde_json::from_str(&json)?)
}

/// `carhire browse`: print the listings visible under the configured filter.
pub fn browse(config: &Config) -> Result<String> {
    let inventory = load_inventory(config.inventory_path.as_deref())?;
    let visible = filter(&inventory, &config.criteria);

    tracing::info!(
        total = inventory.len(),
        visible = visible.len(),
        "browse"
    );
    Ok(serde_json::to_string_pretty(&visible)?)
}

/// `carhire options`: print the choices the filter UI offers.
pub fn options() -> Result<String> {
    Ok(serde_json::to_string_pretty(&FilterOptions::default())?)
}

/// Result of one replayed event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<EventOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<ValidationErrors>,
}

/// Output of `carhire garage`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub results: Vec<EventReport>,
    pub snapshot: GarageSnapshot,
}

/// Build the starting garage from a snapshot file or the bundled seed cars.
pub fn load_garage(config: &Config, snapshot: Option<&Path>) -> Result<Garage> {
    let snapshot = match snapshot {
        Some(path) => GarageSnapshot::from_json(&read(path)?)?,
        None => {
            let cars: Vec<OwnedCar> = serde_json::from_str(BUNDLED_GARAGE)?;
            GarageSnapshot::new(IdGenerator::with_strategy(config.id_strategy), cars)
        }
    };

    let mut garage = Garage::new();
    garage.import_state(snapshot)?;
    Ok(garage)
}

/// Apply events in order. A rejected event is reported and leaves the
/// garage unchanged; replay continues with the next one.
pub fn replay<F>(garage: &mut Garage, events: Vec<GarageEvent>, mut clock: F) -> Vec<EventReport>
where
    F: FnMut() -> u64,
{
    events
        .into_iter()
        .enumerate()
        .map(|(index, event)| match garage.apply(event, clock()) {
            Ok(outcome) => EventReport {
                index,
                outcome: Some(outcome),
                error: None,
                field_errors: None,
            },
            Err(e) => {
                let field_errors = match &e {
                    Error::Validation(errors) => Some(errors.clone()),
                    _ => None,
                };
                EventReport {
                    index,
                    outcome: None,
                    error: Some(e.to_string()),
                    field_errors,
                }
            }
        })
        .collect()
}

/// `carhire garage <events.json> [snapshot.json]`: replay an event log and
/// print per-event results plus the final snapshot.
pub fn garage(config: &Config, events: &Path, snapshot: Option<&Path>) -> Result<String> {
    let mut garage = load_garage(config, snapshot)?;
    let events: Vec<GarageEvent> = serde_json::from_str(&read(events)?)?;
    let count = events.len();

    let results = replay(&mut garage, events, now_millis);
    let rejected = results.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(events = count, rejected, cars = garage.len(), "garage replay");

    let report = ReplayReport {
        results,
        snapshot: garage.export_state(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
