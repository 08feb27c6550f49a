//! Test fixtures for delivery-planner.
//!
//! Provides realistic test data including:
//! - Omaha / Council Bluffs households with postal codes and coordinates
//! - A request builder implementing `Request` with string ids
//! - A deterministic in-memory geocoder

#![allow(dead_code)]

pub mod omaha_households;

pub use omaha_households::*;

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use delivery_planner::geocode::normalize_query;
use delivery_planner::traits::{Geocoder, Request};

/// Fixed "current time" shared by all integration tests.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// Timestamp string for a request submitted `days` before [`now`].
pub fn days_ago(days: i64) -> String {
    (now() - Duration::days(days))
        .format("%m/%d/%Y %H:%M:%S")
        .to_string()
}

/// Builder for test requests with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestRequest {
    pub id: String,
    pub code: Option<String>,
    pub address: Option<String>,
    pub name: Option<String>,
    pub preferences: Vec<String>,
    pub submitted: Option<String>,
    pub scheduled: Option<String>,
}

impl TestRequest {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            code: None,
            address: None,
            name: None,
            preferences: Vec::new(),
            submitted: None,
            scheduled: None,
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn prefers(mut self, dates: &[&str]) -> Self {
        self.preferences = dates.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn submitted(mut self, timestamp: &str) -> Self {
        self.submitted = Some(timestamp.to_string());
        self
    }

    pub fn waiting(self, days: i64) -> Self {
        self.submitted(&days_ago(days))
    }

    pub fn scheduled(mut self, date: &str) -> Self {
        self.scheduled = Some(date.to_string());
        self
    }

    /// Household fixture as a request at that household's code and address.
    pub fn at(id: &str, household: &Household) -> Self {
        Self::new(id)
            .name(household.name)
            .code(household.code)
            .address(household.address)
    }
}

impl Request for TestRequest {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn geo_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    fn date_preferences(&self) -> &[String] {
        &self.preferences
    }

    fn submitted_at(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    fn scheduled_date(&self) -> Option<&str> {
        self.scheduled.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn street_address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Ids of a list of request references, in order.
pub fn ids<'a>(requests: &[&'a TestRequest]) -> Vec<&'a str> {
    requests.iter().map(|r| r.id.as_str()).collect()
}

/// Geocoder backed by a fixed table; unknown queries resolve to nothing.
pub struct TableGeocoder {
    table: HashMap<String, (f64, f64)>,
}

impl TableGeocoder {
    pub fn new(entries: &[(&str, (f64, f64))]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(query, coords)| (normalize_query(query), *coords))
                .collect(),
        }
    }

    /// Every household and depot address in the fixtures.
    pub fn omaha() -> Self {
        let mut entries: Vec<(&str, (f64, f64))> = HOUSEHOLDS
            .iter()
            .map(|household| (household.address, household.coords()))
            .collect();
        entries.push((DEPOT_ADDRESS, DEPOT_COORDS));
        Self::new(&entries)
    }
}

impl Geocoder for TableGeocoder {
    fn resolve(&self, query: &str) -> Option<(f64, f64)> {
        self.table.get(&normalize_query(query)).copied()
    }
}
