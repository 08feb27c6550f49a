//! Date selection: which waiting requests go on which day.
//!
//! A request qualifies for a day when one of its ranked preferences names
//! that day. Qualifying requests are taken in pool order up to the daily
//! quota; [`SelectionPolicy::ByScore`] is available for callers that want the
//! scorer to break ties among matches instead.

use std::collections::HashSet;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dates::{format_date, parse_date, parse_timestamp};
use crate::distance::{AREA_CODE_LEN, area_code, clean_code};
use crate::scorer::{prefers_date, score};
use crate::traits::{MAX_PREFERENCE_RANKS, Request};

/// Deliveries a single truck day can take.
pub const DEFAULT_QUOTA: usize = 4;

/// Number of alternative dates offered when a day has no matches.
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPolicy {
    /// Matching requests in pool order, truncated to the quota.
    PoolOrder,
    /// Greedy highest score among matching requests, re-scored after each pick
    /// against the codes already chosen. Ties keep pool order.
    ByScore { now: NaiveDateTime },
}

#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Maximum requests per date.
    pub quota: usize,
    pub policy: SelectionPolicy,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            policy: SelectionPolicy::PoolOrder,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selection<'a, R> {
    pub selected: Vec<&'a R>,
    /// Unscheduled requests left for later days.
    pub remaining: Vec<&'a R>,
}

/// An alternative date that does have waiting requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSuggestion {
    pub label: String,
    pub days_away: i64,
    pub available: usize,
}

#[derive(Debug, Clone)]
pub struct DaySelection<'a, R> {
    pub date: NaiveDate,
    /// `M/D/YYYY` form of `date`.
    pub label: String,
    pub requests: Vec<&'a R>,
    /// Only filled when `requests` is empty.
    pub suggestions: Vec<DateSuggestion>,
}

/// Selections for a run of consecutive days, in date order.
#[derive(Debug, Clone)]
pub struct SelectionSet<'a, R> {
    pub days: Vec<DaySelection<'a, R>>,
}

impl<'a, R> SelectionSet<'a, R> {
    pub fn get(&self, label: &str) -> Option<&DaySelection<'a, R>> {
        self.days.iter().find(|day| day.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DaySelection<'a, R>> {
        self.days.iter()
    }

    /// Total requests assigned across all days.
    pub fn assigned_count(&self) -> usize {
        self.days.iter().map(|day| day.requests.len()).sum()
    }
}

/// Selects up to `options.quota` requests for `target` from `pool`.
///
/// Scheduled requests in `pool` are ignored and do not appear in `remaining`.
pub fn select_for_date<'a, R>(
    target: NaiveDate,
    pool: &[&'a R],
    options: &SelectOptions,
) -> Selection<'a, R>
where
    R: Request,
{
    let label = format_date(target);

    let matched: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, request)| request.is_unscheduled() && prefers_date(**request, &label))
        .map(|(position, _)| position)
        .collect();

    let picked = match options.policy {
        SelectionPolicy::PoolOrder => matched.into_iter().take(options.quota).collect(),
        SelectionPolicy::ByScore { now } => pick_by_score(pool, matched, &label, options.quota, now),
    };

    let taken: HashSet<usize> = picked.iter().copied().collect();
    let selected = picked.iter().map(|&position| pool[position]).collect();
    let remaining = pool
        .iter()
        .enumerate()
        .filter(|(position, request)| request.is_unscheduled() && !taken.contains(position))
        .map(|(_, request)| *request)
        .collect();

    tracing::debug!(date = %label, selected = taken.len(), "selected requests for date");

    Selection { selected, remaining }
}

fn pick_by_score<R: Request>(
    pool: &[&R],
    mut candidates: Vec<usize>,
    label: &str,
    quota: usize,
    now: NaiveDateTime,
) -> Vec<usize> {
    let mut picked = Vec::new();
    let mut chosen_codes: Vec<String> = Vec::new();

    while picked.len() < quota && !candidates.is_empty() {
        let mut best_slot = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (slot, &position) in candidates.iter().enumerate() {
            let candidate_score = score(pool[position], label, &chosen_codes, now);
            if candidate_score > best_score {
                best_score = candidate_score;
                best_slot = slot;
            }
        }

        let position = candidates.remove(best_slot);
        if let Some(code) = pool[position].geo_code().map(clean_code).filter(|code| !code.is_empty()) {
            chosen_codes.push(code.to_string());
        }
        picked.push(position);
    }

    picked
}

/// Selects requests for `num_days` consecutive days starting at `start`.
///
/// A request chosen for one day is no longer available on the following
/// days. Days without a single match carry date suggestions instead.
pub fn select_for_date_range<'a, R>(
    start: NaiveDate,
    num_days: u64,
    requests: &'a [R],
    options: &SelectOptions,
) -> SelectionSet<'a, R>
where
    R: Request,
{
    let mut pool: Vec<&'a R> = requests.iter().filter(|request| request.is_unscheduled()).collect();
    let mut days = Vec::new();

    for offset in 0..num_days {
        let Some(date) = start.checked_add_days(Days::new(offset)) else {
            break;
        };

        let selection = select_for_date(date, &pool, options);
        pool = selection.remaining;

        let label = format_date(date);
        let suggestions = if selection.selected.is_empty() {
            nearest_dates_with_availability(&label, &pool)
        } else {
            Vec::new()
        };

        days.push(DaySelection {
            date,
            label,
            requests: selection.selected,
            suggestions,
        });
    }

    let set = SelectionSet { days };
    tracing::info!(
        days = set.days.len(),
        assigned = set.assigned_count(),
        left = pool.len(),
        "selected requests for date range"
    );
    set
}

/// Dates closest to `target_label` that waiting requests asked for.
///
/// Dates are gathered rank by rank across the pool (every first choice,
/// then every second choice, ...). The target itself, unreadable dates and
/// dates with no unscheduled request left are skipped. Closest first, ties in
/// the order they were found.
pub fn nearest_dates_with_availability<R: Request>(
    target_label: &str,
    pool: &[&R],
) -> Vec<DateSuggestion> {
    let Some(target) = parse_date(target_label) else {
        tracing::debug!(target = target_label, "unreadable target date, no suggestions");
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut labels: Vec<&str> = Vec::new();
    for rank in 0..MAX_PREFERENCE_RANKS {
        for request in pool {
            if let Some(preference) = request.date_preferences().get(rank) {
                if !preference.is_empty() && seen.insert(preference.as_str()) {
                    labels.push(preference.as_str());
                }
            }
        }
    }

    let mut suggestions: Vec<DateSuggestion> = labels
        .into_iter()
        .filter_map(|label| {
            let date = parse_date(label)?;
            let days_away = (date - target).num_days().abs();
            if days_away == 0 {
                return None;
            }
            let available = pool
                .iter()
                .filter(|request| request.is_unscheduled() && prefers_date(**request, label))
                .count();
            (available > 0).then(|| DateSuggestion {
                label: label.to_string(),
                days_away,
                available,
            })
        })
        .collect();

    suggestions.sort_by_key(|suggestion| suggestion.days_away);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Earliest preference date on or after `today`.
///
/// Falls back to the earliest preference date overall (replayed historical
/// data), then to tomorrow.
pub fn earliest_available_date<R: Request>(requests: &[R], today: NaiveDate) -> NaiveDate {
    let dates: Vec<NaiveDate> = requests
        .iter()
        .flat_map(|request| request.date_preferences().iter().take(MAX_PREFERENCE_RANKS))
        .filter_map(|preference| parse_date(preference))
        .collect();

    dates
        .iter()
        .copied()
        .filter(|date| *date >= today)
        .min()
        .or_else(|| dates.iter().copied().min())
        .or_else(|| today.succ_opt())
        .unwrap_or(today)
}

/// Waiting requests in the same areas as `base`, oldest first.
///
/// Members of `base` are never suggested. Requests with an unreadable
/// timestamp come after dated ones.
pub fn suggest_neighborhood<'a, R>(base: &[&R], pool: &'a [R], max: usize) -> Vec<&'a R>
where
    R: Request,
{
    let base_ids: HashSet<&R::Id> = base.iter().map(|request| request.id()).collect();
    let areas: HashSet<&str> = base
        .iter()
        .filter_map(|request| request.geo_code())
        .map(clean_code)
        .filter(|code| code.chars().count() >= AREA_CODE_LEN)
        .map(area_code)
        .collect();

    if areas.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<(Option<NaiveDateTime>, &'a R)> = pool
        .iter()
        .filter(|request| request.is_unscheduled() && !base_ids.contains(request.id()))
        .filter(|request| {
            request
                .geo_code()
                .map(|code| areas.contains(area_code(clean_code(code))))
                .unwrap_or(false)
        })
        .map(|request| (request.submitted_at().and_then(parse_timestamp), request))
        .collect();

    candidates.sort_by_key(|(submitted, _)| (submitted.is_none(), *submitted));
    candidates.into_iter().take(max).map(|(_, request)| request).collect()
}
