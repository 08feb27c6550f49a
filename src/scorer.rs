//! Preference scoring for a candidate request on a target date.
//!
//! Points are additive: date preference rank, geographic affinity to the
//! codes already chosen for that day, and a capped bonus for time spent
//! waiting. Higher is better.

use chrono::NaiveDateTime;

use crate::dates::days_waiting;
use crate::distance::{clean_code, distance, prefix};
use crate::traits::{MAX_PREFERENCE_RANKS, Request};

/// Points for a match on preference rank 1 through 4.
const RANK_POINTS: [f64; MAX_PREFERENCE_RANKS] = [100.0, 75.0, 50.0, 25.0];

const SAME_CODE_POINTS: f64 = 200.0;
const SAME_FOUR_DIGIT_POINTS: f64 = 150.0;
const SAME_AREA_POINTS: f64 = 100.0;

const MAX_DISTANCE_PENALTY: f64 = 50.0;
const DISTANCE_PENALTY_DIVISOR: f64 = 10.0;

const MAX_WAITING_BONUS: f64 = 20.0;
const WAITING_DAYS_PER_POINT: f64 = 3.0;

/// 1-based rank of the preference that names `target_label`, if any.
pub fn preference_rank<R: Request>(request: &R, target_label: &str) -> Option<usize> {
    request
        .date_preferences()
        .iter()
        .take(MAX_PREFERENCE_RANKS)
        .position(|preference| preference == target_label)
        .map(|index| index + 1)
}

/// Whether any ranked preference names `target_label`.
pub fn prefers_date<R: Request>(request: &R, target_label: &str) -> bool {
    preference_rank(request, target_label).is_some()
}

/// Scores `request` for `target_label` given the codes already chosen that day.
pub fn score<R, S>(request: &R, target_label: &str, chosen_codes: &[S], now: NaiveDateTime) -> f64
where
    R: Request,
    S: AsRef<str>,
{
    let mut score = preference_rank(request, target_label)
        .map(|rank| RANK_POINTS[rank - 1])
        .unwrap_or(0.0);

    let code = request.geo_code().map(clean_code).unwrap_or("");
    if !chosen_codes.is_empty() && !code.is_empty() {
        score += affinity(code, chosen_codes);
    }

    if let Some(days) = days_waiting(request.submitted_at(), now) {
        score += (days as f64 / WAITING_DAYS_PER_POINT).min(MAX_WAITING_BONUS);
    }

    score
}

/// Bonus for the first chosen code sharing a prefix, or a capped distance
/// penalty when no chosen code shares the area.
fn affinity<S: AsRef<str>>(code: &str, chosen_codes: &[S]) -> f64 {
    for chosen in chosen_codes {
        let chosen = chosen.as_ref();
        if code == chosen {
            return SAME_CODE_POINTS;
        }
        if prefix(code, 4) == prefix(chosen, 4) {
            return SAME_FOUR_DIGIT_POINTS;
        }
        if prefix(code, 3) == prefix(chosen, 3) {
            return SAME_AREA_POINTS;
        }
    }

    let nearest = chosen_codes
        .iter()
        .map(|chosen| distance(code, chosen.as_ref()))
        .min()
        .unwrap_or(0);
    -(nearest as f64 / DISTANCE_PENALTY_DIVISOR).min(MAX_DISTANCE_PENALTY)
}
