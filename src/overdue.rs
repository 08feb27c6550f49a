//! Overdue requests and reporting over the request pool: waiting times,
//! upcoming schedule, per-code volume and coverage gaps.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dates::{days_waiting, parse_date};
use crate::distance::postal_code;
use crate::traits::Request;

/// Eight weeks: the usual wait before a request counts as overdue.
pub const DEFAULT_OVERDUE_DAYS: i64 = 56;

/// Days before and after today in which a scheduled request counts as
/// recent service for its code.
pub const RECENT_SERVICE_DAYS: u64 = 30;

/// Half-open `[lower, upper)` waiting-day buckets for reporting.
const WAIT_BUCKETS: [(i64, i64, &str); 6] = [
    (0, 14, "0-2 weeks"),
    (14, 28, "2-4 weeks"),
    (28, 42, "4-6 weeks"),
    (42, 56, "6-8 weeks"),
    (56, 70, "8-10 weeks"),
    (70, 999, "10+ weeks"),
];

#[derive(Debug, Clone)]
pub struct OverdueRequest<'a, R> {
    pub request: &'a R,
    pub days_waiting: i64,
}

/// Unscheduled requests waiting more than `threshold_days`, longest first.
///
/// Requests with an unreadable or future timestamp are left out.
pub fn overdue<'a, R>(pool: &'a [R], threshold_days: i64, now: NaiveDateTime) -> Vec<OverdueRequest<'a, R>>
where
    R: Request,
{
    let mut found: Vec<OverdueRequest<'a, R>> = pool
        .iter()
        .filter(|request| request.is_unscheduled())
        .filter_map(|request| {
            let days = days_waiting(request.submitted_at(), now)?;
            (days > threshold_days && days >= 0).then_some(OverdueRequest {
                request,
                days_waiting: days,
            })
        })
        .collect();

    found.sort_by(|a, b| b.days_waiting.cmp(&a.days_waiting));
    tracing::debug!(threshold_days, overdue = found.len(), "found overdue requests");
    found
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total: usize,
    pub scheduled: usize,
    pub unscheduled: usize,
}

pub fn pool_stats<R: Request>(requests: &[R]) -> PoolStats {
    let unscheduled = requests.iter().filter(|request| request.is_unscheduled()).count();
    PoolStats {
        total: requests.len(),
        scheduled: requests.len() - unscheduled,
        unscheduled,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitBucket {
    pub label: &'static str,
    pub count: usize,
}

/// Request counts per waiting-time bucket.
///
/// Unreadable timestamps and waits outside every bucket are not counted.
pub fn wait_time_buckets<R: Request>(requests: &[R], now: NaiveDateTime) -> Vec<WaitBucket> {
    let mut buckets: Vec<WaitBucket> = WAIT_BUCKETS
        .iter()
        .map(|(_, _, label)| WaitBucket { label: *label, count: 0 })
        .collect();

    for days in requests.iter().filter_map(|request| days_waiting(request.submitted_at(), now)) {
        if let Some(slot) = WAIT_BUCKETS
            .iter()
            .position(|(lower, upper, _)| days >= *lower && days < *upper)
        {
            buckets[slot].count += 1;
        }
    }

    buckets
}

/// Mean days waiting over requests with a readable timestamp.
pub fn average_wait_days<R: Request>(requests: &[R], now: NaiveDateTime) -> Option<f64> {
    let waits: Vec<i64> = requests
        .iter()
        .filter_map(|request| days_waiting(request.submitted_at(), now))
        .collect();

    if waits.is_empty() {
        return None;
    }
    Some(waits.iter().sum::<i64>() as f64 / waits.len() as f64)
}

#[derive(Debug, Clone)]
pub struct ScheduledRequest<'a, R> {
    pub request: &'a R,
    pub date: NaiveDate,
}

/// Requests scheduled from `today` through `days_ahead` days later, soonest
/// first. A negative `days_ahead` looks back instead.
///
/// Unreadable scheduled dates are left out.
pub fn upcoming<'a, R>(requests: &'a [R], days_ahead: i64, today: NaiveDate) -> Vec<ScheduledRequest<'a, R>>
where
    R: Request,
{
    let Some(other_end) = shift(today, days_ahead) else {
        return Vec::new();
    };
    let (from, to) = if days_ahead < 0 { (other_end, today) } else { (today, other_end) };

    let mut found = scheduled_between(requests, from, to);
    found.sort_by_key(|scheduled| scheduled.date);
    found
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(step)
    } else {
        date.checked_add_days(step)
    }
}

fn scheduled_between<R: Request>(requests: &[R], from: NaiveDate, to: NaiveDate) -> Vec<ScheduledRequest<'_, R>> {
    requests
        .iter()
        .filter_map(|request| {
            let date = request.scheduled_date().and_then(parse_date)?;
            (from <= date && date <= to).then_some(ScheduledRequest { request, date })
        })
        .collect()
}

/// Request count for one five-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub requests: usize,
}

/// Busiest codes first; equal counts keep first-appearance order.
fn count_by_code<'a>(codes: impl Iterator<Item = &'a str>) -> Vec<CodeCount> {
    let mut slot_of: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CodeCount> = Vec::new();

    for code in codes.map(postal_code).filter(|code| !code.is_empty()) {
        let slot = *slot_of.entry(code).or_insert_with(|| {
            counts.push(CodeCount {
                code: code.to_string(),
                requests: 0,
            });
            counts.len() - 1
        });
        counts[slot].requests += 1;
    }

    counts.sort_by(|a, b| b.requests.cmp(&a.requests));
    counts
}

/// The `top_n` codes with the most requests, scheduled or not.
pub fn code_distribution<R: Request>(requests: &[R], top_n: usize) -> Vec<CodeCount> {
    let mut counts = count_by_code(requests.iter().filter_map(|request| request.geo_code()));
    counts.truncate(top_n);
    counts
}

/// Codes with waiting requests and no request scheduled within
/// [`RECENT_SERVICE_DAYS`] of `today`, by number of waiting requests.
pub fn coverage_gaps<R: Request>(requests: &[R], today: NaiveDate) -> Vec<CodeCount> {
    let from = today.checked_sub_days(Days::new(RECENT_SERVICE_DAYS)).unwrap_or(today);
    let to = today.checked_add_days(Days::new(RECENT_SERVICE_DAYS)).unwrap_or(today);

    let served: Vec<&str> = scheduled_between(requests, from, to)
        .into_iter()
        .filter_map(|scheduled| scheduled.request.geo_code())
        .map(postal_code)
        .collect();

    let gaps: Vec<CodeCount> = count_by_code(
        requests
            .iter()
            .filter(|request| request.is_unscheduled())
            .filter_map(|request| request.geo_code()),
    )
    .into_iter()
    .filter(|count| !served.contains(&count.code.as_str()))
    .collect();

    tracing::debug!(gaps = gaps.len(), served = served.len(), "found coverage gaps");
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientRequest;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn submitted_days_ago(index: usize, days: i64) -> ClientRequest {
        let at = now() - Duration::days(days);
        ClientRequest::delivery(index).submitted(at.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let pool = vec![submitted_days_ago(0, 56), submitted_days_ago(1, 57)];
        let found = overdue(&pool, 56, now());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].request.index, 1);
        assert_eq!(found[0].days_waiting, 57);
    }

    #[test]
    fn test_future_and_unreadable_excluded_even_with_negative_threshold() {
        let pool = vec![
            submitted_days_ago(0, -3),
            ClientRequest::delivery(1).submitted("whenever"),
            ClientRequest::delivery(2),
            submitted_days_ago(3, 0),
        ];
        let found = overdue(&pool, -10, now());
        let ids: Vec<usize> = found.iter().map(|o| o.request.index).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_pool_stats() {
        let pool = vec![
            ClientRequest::delivery(0),
            ClientRequest::delivery(1).scheduled_on("5/1/2024"),
            ClientRequest::delivery(2).scheduled_on(""),
        ];
        assert_eq!(
            pool_stats(&pool),
            PoolStats {
                total: 3,
                scheduled: 1,
                unscheduled: 2
            }
        );
    }

    #[test]
    fn test_wait_time_buckets() {
        let pool = vec![
            submitted_days_ago(0, 0),
            submitted_days_ago(1, 13),
            submitted_days_ago(2, 14),
            submitted_days_ago(3, 80),
            submitted_days_ago(4, -2),
            ClientRequest::delivery(5),
        ];
        let counts: Vec<usize> = wait_time_buckets(&pool, now()).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_average_wait_days() {
        let pool = vec![
            submitted_days_ago(0, 10),
            submitted_days_ago(1, 30),
            ClientRequest::delivery(2),
        ];
        assert_eq!(average_wait_days(&pool, now()), Some(20.0));

        let empty: Vec<ClientRequest> = Vec::new();
        assert_eq!(average_wait_days(&empty, now()), None);
    }

    #[test]
    fn test_upcoming_window_sorted_by_date() {
        let today = now().date();
        let pool = vec![
            ClientRequest::delivery(0).scheduled_on("6/20/2024"),
            ClientRequest::delivery(1).scheduled_on("6/3/2024"),
            ClientRequest::delivery(2).scheduled_on("5/30/2024"),
            ClientRequest::delivery(3).scheduled_on("8/1/2024"),
            ClientRequest::delivery(4).scheduled_on("someday"),
            ClientRequest::delivery(5),
            ClientRequest::delivery(6).scheduled_on("6/1/2024"),
        ];

        let ahead: Vec<usize> = upcoming(&pool, 30, today).iter().map(|s| s.request.index).collect();
        assert_eq!(ahead, vec![6, 1, 0]);

        let behind: Vec<usize> = upcoming(&pool, -7, today).iter().map(|s| s.request.index).collect();
        assert_eq!(behind, vec![2, 6]);
    }

    #[test]
    fn test_code_distribution_top_n() {
        let pool = vec![
            ClientRequest::delivery(0).with_code("68104"),
            ClientRequest::delivery(1).with_code("68137"),
            ClientRequest::delivery(2).with_code("68137-4410"),
            ClientRequest::delivery(3).with_code("68104 NE").scheduled_on("6/3/2024"),
            ClientRequest::delivery(4).with_code("51501"),
            ClientRequest::delivery(5),
        ];

        let top = code_distribution(&pool, 2);
        assert_eq!(
            top,
            vec![
                CodeCount { code: "68104".to_string(), requests: 2 },
                CodeCount { code: "68137".to_string(), requests: 2 },
            ]
        );
        assert_eq!(code_distribution(&pool, 10).len(), 3);
    }

    #[test]
    fn test_coverage_gaps_skip_recently_served_codes() {
        let today = now().date();
        let pool = vec![
            ClientRequest::delivery(0).with_code("68104"),
            ClientRequest::delivery(1).with_code("68104").scheduled_on("5/20/2024"),
            ClientRequest::delivery(2).with_code("68137"),
            ClientRequest::delivery(3).with_code("68137").scheduled_on("1/5/2024"),
            ClientRequest::delivery(4).with_code("51501"),
            ClientRequest::delivery(5).with_code("51501"),
            ClientRequest::delivery(6).with_code("68105").scheduled_on("6/10/2024"),
        ];

        let gaps = coverage_gaps(&pool, today);
        let codes: Vec<(&str, usize)> = gaps.iter().map(|g| (g.code.as_str(), g.requests)).collect();
        assert_eq!(codes, vec![("51501", 2), ("68137", 1)]);
    }
}
