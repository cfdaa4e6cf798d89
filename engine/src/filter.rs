//! Multi-criteria filtering of the rental inventory.
//!
//! The browsing screen keeps a [`FilterCriteria`] and re-runs [`filter`] on
//! every change. Filtering is pure: the inventory is never mutated and the
//! result keeps the inventory's relative order.
//!
//! # Predicates
//!
//! A listing is visible when all of the following hold:
//! 1. `types` is empty, or the listing's car type is selected
//! 2. `min_ratings` is empty, or the rating clears the selected thresholds
//!    (any one of them by default, see [`RatingMatch`])
//! 3. `drive_types` is empty, or the listing's drive type is selected
//! 4. `search_text` is empty, or the driver name contains it, ignoring case
//!
//! Thresholds that do not parse as numbers are never satisfied. They are
//! reported as [`ParseWarning`]s instead of failing the whole filter.

use crate::CarListing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Car categories offered by the filter UI.
pub const CAR_TYPES: [&str; 4] = ["SUV", "Sedan", "Compact", "Luxury"];

/// Minimum-rating choices offered by the filter UI.
pub const MIN_RATINGS: [&str; 2] = ["4.0", "4.5"];

/// Drive types offered by the filter UI.
pub const DRIVE_TYPES: [&str; 2] = ["Self", "With Driver"];

/// How multiple selected rating thresholds combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingMatch {
    /// The rating must clear at least one threshold (default)
    #[default]
    Any,
    /// The rating must clear every threshold
    All,
}

impl std::str::FromStr for RatingMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(RatingMatch::Any),
            "all" => Ok(RatingMatch::All),
            other => Err(format!("unknown rating match mode: {other}")),
        }
    }
}

/// A selected rating threshold that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub threshold: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rating threshold '{}' is not a number and never matches",
            self.threshold
        )
    }
}

/// Current filter selection on the browsing screen.
///
/// Every dimension is a set of selected values, so radio-button and checkbox
/// variants of the filter UI drive the same engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub types: BTreeSet<String>,
    pub min_ratings: BTreeSet<String>,
    pub drive_types: BTreeSet<String>,
    pub rating_match: RatingMatch,
}

fn toggle(set: &mut BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn select(set: &mut BTreeSet<String>, value: String) {
    set.clear();
    set.insert(value);
}

impl FilterCriteria {
    /// Empty criteria: the identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_type(mut self, car_type: impl Into<String>) -> Self {
        self.types.insert(car_type.into());
        self
    }

    pub fn with_min_rating(mut self, threshold: impl Into<String>) -> Self {
        self.min_ratings.insert(threshold.into());
        self
    }

    pub fn with_drive_type(mut self, drive_type: impl Into<String>) -> Self {
        self.drive_types.insert(drive_type.into());
        self
    }

    pub fn with_rating_match(mut self, mode: RatingMatch) -> Self {
        self.rating_match = mode;
        self
    }

    // Radio-button selection: exactly one value per dimension.

    pub fn select_type(&mut self, car_type: impl Into<String>) {
        select(&mut self.types, car_type.into());
    }

    pub fn select_min_rating(&mut self, threshold: impl Into<String>) {
        select(&mut self.min_ratings, threshold.into());
    }

    pub fn select_drive_type(&mut self, drive_type: impl Into<String>) {
        select(&mut self.drive_types, drive_type.into());
    }

    // Checkbox selection.

    pub fn toggle_type(&mut self, car_type: impl Into<String>) {
        toggle(&mut self.types, car_type.into());
    }

    pub fn toggle_min_rating(&mut self, threshold: impl Into<String>) {
        toggle(&mut self.min_ratings, threshold.into());
    }

    pub fn toggle_drive_type(&mut self, drive_type: impl Into<String>) {
        toggle(&mut self.drive_types, drive_type.into());
    }

    /// Reset every dimension, as the "Clear Filters" action does.
    pub fn clear(&mut self) {
        self.search_text.clear();
        self.types.clear();
        self.min_ratings.clear();
        self.drive_types.clear();
    }

    /// Whether no constraint is selected.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty()
            && self.types.is_empty()
            && self.min_ratings.is_empty()
            && self.drive_types.is_empty()
    }

    /// Selected thresholds that do not parse as numbers.
    pub fn rating_warnings(&self) -> Vec<ParseWarning> {
        self.min_ratings
            .iter()
            .filter(|t| parse_threshold(t).is_none())
            .map(|t| ParseWarning {
                threshold: t.clone(),
            })
            .collect()
    }

    /// Check a single listing against these criteria.
    pub fn matches(&self, listing: &CarListing) -> bool {
        Compiled::new(self).matches(listing)
    }
}

fn parse_threshold(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|t| !t.is_nan())
}

/// Criteria with thresholds parsed and search text folded once per run.
struct Compiled<'c> {
    criteria: &'c FilterCriteria,
    search: String,
    thresholds: Vec<Option<f64>>,
}

impl<'c> Compiled<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        Self {
            criteria,
            search: criteria.search_text.to_lowercase(),
            thresholds: criteria
                .min_ratings
                .iter()
                .map(|t| parse_threshold(t))
                .collect(),
        }
    }

    fn matches_rating(&self, rating: f64) -> bool {
        if self.thresholds.is_empty() {
            return true;
        }
        let clears = |t: &Option<f64>| t.is_some_and(|t| rating >= t);
        match self.criteria.rating_match {
            RatingMatch::Any => self.thresholds.iter().any(clears),
            RatingMatch::All => self.thresholds.iter().all(clears),
        }
    }

    fn matches(&self, listing: &CarListing) -> bool {
        let c = self.criteria;
        (c.types.is_empty() || c.types.contains(&listing.car_type))
            && self.matches_rating(listing.rating)
            && (c.drive_types.is_empty() || c.drive_types.contains(&listing.drive_type))
            && (self.search.is_empty()
                || listing.driver_name.to_lowercase().contains(&self.search))
    }
}

/// Compute the visible subset of `inventory`, preserving order.
pub fn filter<'a>(inventory: &'a [CarListing], criteria: &FilterCriteria) -> Vec<&'a CarListing> {
    if criteria.is_empty() {
        return inventory.iter().collect();
    }

    for warning in criteria.rating_warnings() {
        tracing::warn!("{}", warning);
    }

    let compiled = Compiled::new(criteria);
    let visible: Vec<_> = inventory.iter().filter(|l| compiled.matches(l)).collect();

    tracing::debug!(
        total = inventory.len(),
        visible = visible.len(),
        "filtered inventory"
    );
    visible
}

/// Owned variant of [`filter`] for callers that hand the result across a
/// boundary.
pub fn filter_owned(inventory: &[CarListing], criteria: &FilterCriteria) -> Vec<CarListing> {
    filter(inventory, criteria).into_iter().cloned().collect()
}

/// The choices the filter UI offers for each dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub car_types: Vec<String>,
    pub min_ratings: Vec<String>,
    pub drive_types: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            car_types: owned(&CAR_TYPES),
            min_ratings: owned(&MIN_RATINGS),
            drive_types: owned(&DRIVE_TYPES),
        }
    }
}
