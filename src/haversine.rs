//! Great-circle distance between geocoded stops.
//!
//! Ignores roads entirely. Used for the approximate mileage shown next to a
//! route, never for ordering stops.

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Haversine distance between two points in miles.
pub fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Distance in miles, or infinity when either side failed to geocode.
pub fn distance_miles(from: Option<(f64, f64)>, to: Option<(f64, f64)>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) => haversine_miles(from, to),
        _ => f64::INFINITY,
    }
}

/// Total miles visiting `points` in order. Unresolved points are skipped.
pub fn route_miles(points: &[Option<(f64, f64)>]) -> f64 {
    let mut total = 0.0;
    let mut previous: Option<(f64, f64)> = None;

    for point in points.iter().flatten() {
        if let Some(from) = previous {
            total += haversine_miles(from, *point);
        }
        previous = Some(*point);
    }

    total
}
