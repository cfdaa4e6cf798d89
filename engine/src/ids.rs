//! Identifier generation for newly created cars.
//!
//! The default strategy issues millisecond timestamps, bumped so that every
//! issued id is strictly greater than the previous one. Two cars created in
//! the same millisecond therefore still get distinct ids.

use crate::{error::Result, CarId, Error, Timestamp};
use serde::{Deserialize, Serialize};

/// How new ids are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Decimal millisecond timestamp, strictly increasing (default)
    #[default]
    Timestamp,
    /// Random v4 UUID
    Uuid,
}

impl std::str::FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(IdStrategy::Timestamp),
            "uuid" => Ok(IdStrategy::Uuid),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}

/// Source of unique car ids for a garage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdGenerator {
    strategy: IdStrategy,
    /// Highest numeric id issued or observed so far
    last_issued: u64,
}

impl IdGenerator {
    /// Create a timestamp-based generator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            last_issued: 0,
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Issue the next id.
    ///
    /// Fails with [`Error::IdSpaceExhausted`] once `u64::MAX` has been issued
    /// or observed.
    pub fn next(&mut self, timestamp: Timestamp) -> Result<CarId> {
        match self.strategy {
            IdStrategy::Timestamp => {
                let floor = self
                    .last_issued
                    .checked_add(1)
                    .ok_or(Error::IdSpaceExhausted {
                        last_issued: self.last_issued,
                    })?;
                self.last_issued = timestamp.max(floor);
                Ok(self.last_issued.to_string())
            }
            IdStrategy::Uuid => Ok(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// Issue the next id that `taken` reports as free.
    ///
    /// Timestamp ids strictly increase, so the search ends at the first free
    /// id or at [`Error::IdSpaceExhausted`].
    pub fn next_unused(
        &mut self,
        timestamp: Timestamp,
        taken: impl Fn(&str) -> bool,
    ) -> Result<CarId> {
        loop {
            let id = self.next(timestamp)?;
            if !taken(&id) {
                return Ok(id);
            }
        }
    }

    /// Advance past an id that already exists, so it is never issued again.
    /// Non-numeric ids are ignored.
    pub fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.last_issued = self.last_issued.max(n);
        }
    }
}
