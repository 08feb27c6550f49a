//! Planner configuration.
//!
//! Every field has a default, so a config file only needs the values that
//! differ from a stock setup.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::address_book::{AddressBook, DEFAULT_LOCALITY};
use crate::geocode::{DEFAULT_PARALLELISM, NominatimConfig};
use crate::overdue::DEFAULT_OVERDUE_DAYS;
use crate::proximity::DEFAULT_MAX_PICKUPS;
use crate::selector::{DEFAULT_QUOTA, SelectOptions, SelectionPolicy};
use crate::sequencer::Depot;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub depot: Depot,
    /// Deliveries per day.
    pub quota: usize,
    /// Pickups suggested per route.
    pub max_pickups: usize,
    pub overdue_threshold_days: i64,
    /// Locality for codes missing from the address book.
    pub locality: String,
    pub geocoder: NominatimConfig,
    /// Concurrent geocoding lookups.
    pub geocode_parallelism: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depot: Depot::default(),
            quota: DEFAULT_QUOTA,
            max_pickups: DEFAULT_MAX_PICKUPS,
            overdue_threshold_days: DEFAULT_OVERDUE_DAYS,
            locality: DEFAULT_LOCALITY.to_string(),
            geocoder: NominatimConfig::default(),
            geocode_parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), "loaded planner config");
        Ok(config)
    }

    /// Selection options using pool-order truncation.
    pub fn select_options(&self) -> SelectOptions {
        SelectOptions {
            quota: self.quota,
            policy: SelectionPolicy::PoolOrder,
        }
    }

    pub fn address_book(&self) -> AddressBook {
        AddressBook::new(self.locality.clone())
    }
}
