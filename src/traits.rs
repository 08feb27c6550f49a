//! Core domain traits for the delivery planner.
//!
//! These are intentionally minimal. Callers implement them for their own
//! intake records; `crate::model::ClientRequest` is the bundled implementation.

use std::hash::Hash;

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash {}

impl<T> Id for T where T: Clone + Eq + Hash {}

/// Maximum number of ranked date preferences a request can state.
pub const MAX_PREFERENCE_RANKS: usize = 4;

/// A delivery or pickup request waiting to be placed on a route.
pub trait Request {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Postal code, possibly with trailing noise ("68137 NE").
    fn geo_code(&self) -> Option<&str>;

    /// Preferred dates in rank order (`M/D/YYYY`). Only the first
    /// [`MAX_PREFERENCE_RANKS`] entries are considered.
    fn date_preferences(&self) -> &[String];

    /// Raw submission timestamp as entered on the intake form.
    fn submitted_at(&self) -> Option<&str>;

    /// Scheduled date. `None` or empty means the request is still waiting.
    fn scheduled_date(&self) -> Option<&str>;

    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Full street address, when the intake form captured one.
    fn street_address(&self) -> Option<&str> {
        None
    }

    fn contact(&self) -> Option<&str> {
        None
    }

    fn notes(&self) -> Option<&str> {
        None
    }

    /// Whether the request belongs to the unscheduled pool.
    fn is_unscheduled(&self) -> bool {
        self.scheduled_date().is_none_or(str::is_empty)
    }
}

/// Resolves an address or postal code to coordinates (lat, lon).
///
/// Implementations must not fail loudly: an unavailable service or an unknown
/// address is reported as `None`.
pub trait Geocoder {
    fn resolve(&self, query: &str) -> Option<(f64, f64)>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn resolve(&self, query: &str) -> Option<(f64, f64)> {
        (**self).resolve(query)
    }
}
