//! Route sequencing for a single truck day.
//!
//! Stops are grouped by area code, areas are visited in order of their
//! distance from the depot, and each area is walked nearest-neighbor style
//! starting from wherever the previous area ended. Deliveries are then
//! emitted before pickups, each keeping its relative geographic order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::address_book::AddressBook;
use crate::distance::{area_code, clean_code, distance};
use crate::traits::Request;

pub const DEFAULT_DEPOT_CODE: &str = "68137";
pub const DEFAULT_DEPOT_ADDRESS: &str = "10808 J St, Omaha, NE 68137";

/// Morning slots for deliveries, by position.
pub const DELIVERY_TIME_SLOTS: [&str; 4] = ["9:45 AM", "10:30 AM", "11:15 AM", "12:00 PM"];
pub const DELIVERY_OVERFLOW_TIME: &str = "2:00 PM";

/// Early afternoon slots for pickups, by position.
pub const PICKUP_TIME_SLOTS: [&str; 3] = ["1:00 PM", "1:30 PM", "2:00 PM"];
pub const PICKUP_OVERFLOW_TIME: &str = "4:00 PM";

const DEPOT_START_TIME: &str = "9:30 AM";
const DEPOT_START_LABEL: &str = "Load furniture for deliveries";
const DEPOT_START_NOTES: &str = "Load Truck";
const DEPOT_END_TIME: &str = "2:30 PM";
const DEPOT_END_LABEL: &str = "Unload donated items";
const DEPOT_END_NOTES: &str = "Unload Truck";

const PICKUP_NOTES: &str = "Collect donated items";
const MAX_NOTES_CHARS: usize = 50;
const MIN_STREET_ADDRESS_CHARS: usize = 5;
const NOT_AVAILABLE: &str = "N/A";

/// Fixed start and end point of every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Depot {
    pub code: String,
    pub address: String,
}

impl Default for Depot {
    fn default() -> Self {
        Self {
            code: DEFAULT_DEPOT_CODE.to_string(),
            address: DEFAULT_DEPOT_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    DepotStart,
    Delivery,
    Pickup,
    DepotEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    /// 1-based position in the route.
    pub ordinal: usize,
    pub kind: StopKind,
    pub name: String,
    /// Street address, or a code-derived address when none was given.
    pub location: String,
    pub geo_code: Option<String>,
    pub contact: String,
    pub notes: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteCounts {
    pub deliveries: usize,
    pub pickups: usize,
    /// Stops excluding the depot start and end.
    pub total_stops: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn counts(&self) -> RouteCounts {
        let deliveries = self.count(StopKind::Delivery);
        let pickups = self.count(StopKind::Pickup);
        RouteCounts {
            deliveries,
            pickups,
            total_stops: deliveries + pickups,
        }
    }

    fn count(&self, kind: StopKind) -> usize {
        self.stops.iter().filter(|stop| stop.kind == kind).count()
    }
}

enum Tag<'a, D, P> {
    Delivery(&'a D),
    Pickup(&'a P),
}

struct TaggedStop<'a, D, P> {
    tag: Tag<'a, D, P>,
    code: String,
}

/// Orders deliveries and pickups by area, then nearest neighbor within each
/// area, and splits the combined order back by kind.
///
/// Requests without a postal code are placed as if they were at the depot.
pub fn order_by_area<'a, D, P>(
    deliveries: &[&'a D],
    pickups: &[&'a P],
    depot_code: &str,
) -> (Vec<&'a D>, Vec<&'a P>)
where
    D: Request,
    P: Request,
{
    let depot_code = clean_code(depot_code);
    let code_or_depot = |code: Option<&str>| -> String {
        code.map(clean_code)
            .filter(|code| !code.is_empty())
            .unwrap_or(depot_code)
            .to_string()
    };

    let tagged: Vec<TaggedStop<'a, D, P>> = deliveries
        .iter()
        .map(|delivery| TaggedStop {
            tag: Tag::Delivery(*delivery),
            code: code_or_depot(delivery.geo_code()),
        })
        .chain(pickups.iter().map(|pickup| TaggedStop {
            tag: Tag::Pickup(*pickup),
            code: code_or_depot(pickup.geo_code()),
        }))
        .collect();

    // Areas in order of first appearance.
    let mut area_index: HashMap<&str, usize> = HashMap::new();
    let mut areas: Vec<(&str, Vec<usize>)> = Vec::new();
    for (i, stop) in tagged.iter().enumerate() {
        let area = area_code(&stop.code);
        let slot = *area_index.entry(area).or_insert_with(|| {
            areas.push((area, Vec::new()));
            areas.len() - 1
        });
        areas[slot].1.push(i);
    }

    areas.sort_by_key(|(area, _)| distance(depot_code, &format!("{}00", area)));

    let mut ordered: Vec<usize> = Vec::with_capacity(tagged.len());
    let mut current = depot_code;
    for (_, mut remaining) in areas {
        while !remaining.is_empty() {
            let nearest = remaining
                .iter()
                .enumerate()
                .min_by_key(|(_, i)| distance(current, &tagged[**i].code))
                .map(|(slot, _)| slot)
                .unwrap_or(0);
            let next = remaining.remove(nearest);
            current = tagged[next].code.as_str();
            ordered.push(next);
        }
    }

    let mut ordered_deliveries = Vec::with_capacity(deliveries.len());
    let mut ordered_pickups = Vec::with_capacity(pickups.len());
    for i in ordered {
        match tagged[i].tag {
            Tag::Delivery(delivery) => ordered_deliveries.push(delivery),
            Tag::Pickup(pickup) => ordered_pickups.push(pickup),
        }
    }

    (ordered_deliveries, ordered_pickups)
}

/// Builds the timed stop list for one route, bracketed by the depot.
pub fn sequence<D, P>(deliveries: &[&D], pickups: &[&P], depot: &Depot, address_book: &AddressBook) -> Route
where
    D: Request,
    P: Request,
{
    let (deliveries, pickups) = order_by_area(deliveries, pickups, &depot.code);
    let mut stops = Vec::with_capacity(deliveries.len() + pickups.len() + 2);

    stops.push(depot_stop(1, StopKind::DepotStart, depot));

    for (i, delivery) in deliveries.iter().enumerate() {
        stops.push(Stop {
            ordinal: stops.len() + 1,
            kind: StopKind::Delivery,
            name: non_empty(delivery.display_name())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Client #{}", i + 1)),
            location: stop_location(*delivery, address_book),
            geo_code: geo_code(*delivery),
            contact: contact(*delivery),
            notes: non_empty(delivery.notes())
                .map(|notes| notes.chars().take(MAX_NOTES_CHARS).collect())
                .unwrap_or_default(),
            time: DELIVERY_TIME_SLOTS
                .get(i)
                .copied()
                .unwrap_or(DELIVERY_OVERFLOW_TIME)
                .to_string(),
        });
    }

    for (i, pickup) in pickups.iter().enumerate() {
        stops.push(Stop {
            ordinal: stops.len() + 1,
            kind: StopKind::Pickup,
            name: non_empty(pickup.display_name()).unwrap_or("Unknown").to_string(),
            location: stop_location(*pickup, address_book),
            geo_code: geo_code(*pickup),
            contact: contact(*pickup),
            notes: PICKUP_NOTES.to_string(),
            time: PICKUP_TIME_SLOTS
                .get(i)
                .copied()
                .unwrap_or(PICKUP_OVERFLOW_TIME)
                .to_string(),
        });
    }

    stops.push(depot_stop(stops.len() + 1, StopKind::DepotEnd, depot));

    let route = Route { stops };
    let counts = route.counts();
    tracing::info!(
        deliveries = counts.deliveries,
        pickups = counts.pickups,
        "sequenced route"
    );
    route
}

fn depot_stop(ordinal: usize, kind: StopKind, depot: &Depot) -> Stop {
    let (name, notes, time) = match kind {
        StopKind::DepotStart => (DEPOT_START_LABEL, DEPOT_START_NOTES, DEPOT_START_TIME),
        _ => (DEPOT_END_LABEL, DEPOT_END_NOTES, DEPOT_END_TIME),
    };

    Stop {
        ordinal,
        kind,
        name: name.to_string(),
        location: depot.address.clone(),
        geo_code: Some(depot.code.clone()),
        contact: NOT_AVAILABLE.to_string(),
        notes: notes.to_string(),
        time: time.to_string(),
    }
}

/// Street address when one was captured, otherwise the address book entry
/// for the request's code.
fn stop_location<R: Request>(request: &R, address_book: &AddressBook) -> String {
    if let Some(address) = non_empty(request.street_address()) {
        if address.chars().count() >= MIN_STREET_ADDRESS_CHARS {
            return address.to_string();
        }
    }

    match geo_code(request) {
        Some(code) => address_book.resolve(&code),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn geo_code<R: Request>(request: &R) -> Option<String> {
    request
        .geo_code()
        .map(clean_code)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

fn contact<R: Request>(request: &R) -> String {
    non_empty(request.contact()).unwrap_or(NOT_AVAILABLE).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
