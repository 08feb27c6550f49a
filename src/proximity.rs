//! Pickup matching against a day's deliveries.

use crate::distance::{clean_code, distance};
use crate::traits::Request;

/// Pickups a day's route takes by default.
pub const DEFAULT_MAX_PICKUPS: usize = 3;

/// Cleaned, non-empty postal codes of a delivery selection.
pub fn delivery_codes<R: Request>(deliveries: &[&R]) -> Vec<String> {
    deliveries
        .iter()
        .filter_map(|delivery| delivery.geo_code())
        .map(clean_code)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unscheduled pickups closest to any of `delivery_codes`, nearest first.
///
/// Pickups without a postal code are never returned. Equal distances keep
/// pool order.
pub fn nearby_pickups<'a, P, S>(delivery_codes: &[S], pickups: &'a [P], max_count: usize) -> Vec<&'a P>
where
    P: Request,
    S: AsRef<str>,
{
    let targets: Vec<&str> = delivery_codes
        .iter()
        .map(|code| code.as_ref().trim())
        .filter(|code| !code.is_empty())
        .collect();

    if targets.is_empty() {
        tracing::debug!("no delivery codes to match pickups against");
        return Vec::new();
    }

    let mut scored: Vec<(u32, &'a P)> = pickups
        .iter()
        .filter(|pickup| pickup.is_unscheduled())
        .filter_map(|pickup| {
            let code = clean_code(pickup.geo_code()?);
            if code.is_empty() {
                return None;
            }
            let nearest = targets.iter().map(|target| distance(code, target)).min()?;
            Some((nearest, pickup))
        })
        .collect();

    scored.sort_by_key(|(nearest, _)| *nearest);
    scored.truncate(max_count);

    tracing::debug!(matched = scored.len(), "ranked nearby pickups");
    scored.into_iter().map(|(_, pickup)| pickup).collect()
}
