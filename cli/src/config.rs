//! Configuration management for the CLI.

use carhire_engine::{FilterCriteria, IdStrategy, RatingMatch};
use std::env;
use std::path::PathBuf;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inventory JSON file; the bundled sample when unset
    pub inventory_path: Option<PathBuf>,
    /// Filter selection for `browse`
    pub criteria: FilterCriteria,
    /// Id strategy for cars created by `garage`
    pub id_strategy: IdStrategy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inventory_path = lookup("CARHIRE_INVENTORY")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut criteria = FilterCriteria::new();
        if let Some(search) = lookup("CARHIRE_SEARCH") {
            criteria.search_text = search;
        }
        criteria.types.extend(list(lookup("CARHIRE_TYPES")));
        criteria.min_ratings.extend(list(lookup("CARHIRE_MIN_RATINGS")));
        criteria.drive_types.extend(list(lookup("CARHIRE_DRIVE_TYPES")));
        if let Some(mode) = lookup("CARHIRE_RATING_MATCH") {
            criteria.rating_match = mode
                .parse::<RatingMatch>()
                .map_err(|_| ConfigError::InvalidRatingMatch(mode))?;
        }

        let id_strategy = match lookup("CARHIRE_ID_STRATEGY") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidIdStrategy(value))?,
            None => IdStrategy::default(),
        };

        Ok(Self {
            inventory_path,
            criteria,
            id_strategy,
        })
    }
}

/// Split a comma-separated variable, dropping blank entries.
fn list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CARHIRE_RATING_MATCH value: {0} (expected any or all)")]
    InvalidRatingMatch(String),

    #[error("Invalid CARHIRE_ID_STRATEGY value: {0} (expected timestamp or uuid)")]
    InvalidIdStrategy(String),
}
