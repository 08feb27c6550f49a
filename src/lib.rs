//! delivery-planner core
//!
//! Picks waiting delivery requests for calendar days, matches nearby pickups,
//! and sequences a single truck's stops between depot departure and return.

pub mod traits;
pub mod model;
pub mod config;
pub mod dates;
pub mod distance;
pub mod scorer;
pub mod selector;
pub mod proximity;
pub mod sequencer;
pub mod address_book;
pub mod overdue;
pub mod ingest;
pub mod geocode;
pub mod haversine;
pub mod plot;
