//! Map-ready geometry for a sequenced route.
//!
//! Every stop is geocoded once, in a single batch, before anything is drawn.
//! Stops that cannot be resolved keep their place in the route with no point.

use serde::{Deserialize, Serialize};

use crate::geocode::batch_resolve;
use crate::haversine::route_miles;
use crate::sequencer::Route;
use crate::traits::Geocoder;

/// Resolved (lat, lon) per stop, parallel to `Route::stops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlot {
    points: Vec<Option<(f64, f64)>>,
    /// Approximate straight-line miles over the resolved stops.
    pub total_miles: f64,
}

impl RoutePlot {
    pub fn new(points: Vec<Option<(f64, f64)>>) -> Self {
        let total_miles = route_miles(&points);
        Self { points, total_miles }
    }

    pub fn points(&self) -> &[Option<(f64, f64)>] {
        &self.points
    }

    /// Resolved coordinates only, in route order.
    pub fn resolved(&self) -> Vec<(f64, f64)> {
        self.points.iter().flatten().copied().collect()
    }

    /// Stops that could not be placed on the map.
    pub fn unmapped(&self) -> usize {
        self.points.iter().filter(|point| point.is_none()).count()
    }
}

/// Geocodes each stop's location and measures the route.
pub fn plot_route<G>(route: &Route, geocoder: &G, parallelism: usize) -> RoutePlot
where
    G: Geocoder + Sync,
{
    let queries: Vec<String> = route.stops.iter().map(|stop| stop.location.clone()).collect();
    let plot = RoutePlot::new(batch_resolve(geocoder, &queries, parallelism));

    if plot.unmapped() > 0 {
        tracing::warn!(
            unmapped = plot.unmapped(),
            stops = route.stops.len(),
            "some stops could not be mapped"
        );
    }
    plot
}
