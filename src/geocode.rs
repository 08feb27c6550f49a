//! Geocoding collaborators: a paced Nominatim HTTP adapter, an in-memory
//! cache, and a bounded parallel batch resolver.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::Deserialize;

use crate::traits::Geocoder;

/// Default number of concurrent lookups in a batch.
pub const DEFAULT_PARALLELISM: usize = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Attempts per lookup before giving up.
    pub retry_count: u32,
    pub retry_backoff_ms: u64,
    /// Minimum spacing between requests to the service, shared by every
    /// thread using the same geocoder. The public Nominatim instance allows
    /// one request per second.
    pub min_interval_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "delivery-planner".to_string(),
            timeout_secs: 10,
            retry_count: 3,
            retry_backoff_ms: 2000,
            min_interval_ms: 1000,
        }
    }
}

/// Hands out request slots at least `interval` apart.
///
/// A caller reserves the next free slot under the lock and sleeps outside it,
/// so concurrent callers queue up instead of firing together.
#[derive(Debug)]
pub struct RequestGate {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RequestGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Blocks until this caller's slot comes up.
    pub fn wait_turn(&self) {
        let now = Instant::now();
        let slot = {
            let mut next_slot = self.next_slot.lock();
            let slot = (*next_slot).max(now);
            *next_slot = slot + self.interval;
            slot
        };

        let wait = slot.saturating_duration_since(now);
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
    gate: Arc<RequestGate>,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        let gate = Arc::new(RequestGate::new(Duration::from_millis(config.min_interval_ms)));
        Ok(Self { config, client, gate })
    }

    fn search(&self, query: &str) -> Result<Option<(f64, f64)>, reqwest::Error> {
        self.gate.wait_turn();
        let url = format!("{}/search", self.config.base_url);
        let results = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())?;

        Ok(results.first().and_then(NominatimPlace::coordinates))
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, query: &str) -> Option<(f64, f64)> {
        let attempts = self.config.retry_count.max(1);
        for attempt in 1..=attempts {
            match self.search(query) {
                Ok(found) => return found,
                Err(err) => {
                    tracing::warn!(query, attempt, error = %err, "geocoding request failed");
                    if attempt < attempts {
                        thread::sleep(Duration::from_millis(self.config.retry_backoff_ms));
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
    }
}

/// Memoizes successful lookups of an inner geocoder.
///
/// Keys are normalized (trimmed, lowercased, whitespace collapsed) so the
/// same address typed twice hits the cache. Failures are not cached.
#[derive(Debug)]
pub struct CachingGeocoder<G> {
    inner: G,
    cache: RwLock<HashMap<String, (f64, f64)>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached coordinates.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    fn resolve(&self, query: &str) -> Option<(f64, f64)> {
        let key = normalize_query(query);
        if key.is_empty() {
            return None;
        }

        let cached = self.cache.read().get(&key).copied();
        if cached.is_some() {
            return cached;
        }

        let resolved = self.inner.resolve(query)?;
        self.cache.write().insert(key, resolved);
        Some(resolved)
    }
}

pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves every query once, at most `parallelism` at a time.
///
/// Results come back in input order; repeated queries share one lookup.
pub fn batch_resolve<G>(geocoder: &G, queries: &[String], parallelism: usize) -> Vec<Option<(f64, f64)>>
where
    G: Geocoder + Sync,
{
    let mut unique: Vec<&str> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();
    let slots: Vec<usize> = queries
        .iter()
        .map(|query| {
            *slot_of.entry(normalize_query(query)).or_insert_with(|| {
                unique.push(query.as_str());
                unique.len() - 1
            })
        })
        .collect();

    let resolve_all = || -> Vec<Option<(f64, f64)>> {
        unique.par_iter().map(|query| geocoder.resolve(query)).collect()
    };

    let resolved = match rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
    {
        Ok(pool) => pool.install(resolve_all),
        Err(err) => {
            tracing::warn!(error = %err, "geocoding pool unavailable, resolving sequentially");
            unique.iter().map(|query| geocoder.resolve(query)).collect()
        }
    };

    let missing = resolved.iter().filter(|found| found.is_none()).count();
    tracing::info!(queries = unique.len(), missing, "batch geocoded");

    slots.into_iter().map(|slot| resolved[slot]).collect()
}
