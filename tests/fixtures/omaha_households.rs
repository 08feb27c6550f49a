//! Omaha / Council Bluffs households for realistic test fixtures.
//!
//! Addresses are representative street addresses in each postal code, with
//! approximate coordinates for that part of the metro.

/// A household with its postal code, street address and coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Household {
    pub name: &'static str,
    pub code: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Household {
    pub const fn new(name: &'static str, code: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            code,
            address,
            lat,
            lng,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

pub const DEPOT_CODE: &str = "68137";
pub const DEPOT_ADDRESS: &str = "10808 J St, Omaha, NE 68137";
pub const DEPOT_COORDS: (f64, f64) = (41.2131, -96.0836);

// ============================================================================
// Central / Midtown Omaha
// ============================================================================

pub const MIDTOWN: &[Household] = &[
    Household::new("Alvarez", "68102", "1610 Howard St, Omaha, NE 68102", 41.2555, -95.9362),
    Household::new("Brooks", "68104", "5021 Hamilton St, Omaha, NE 68104", 41.2713, -95.9922),
    Household::new("Chen", "68105", "3402 Mason St, Omaha, NE 68105", 41.2489, -95.9650),
    Household::new("Dlamini", "68106", "5915 Pine St, Omaha, NE 68106", 41.2397, -96.0010),
    Household::new("Eriksen", "68131", "3520 Chicago St, Omaha, NE 68131", 41.2638, -95.9668),
];

// ============================================================================
// West Omaha
// ============================================================================

pub const WEST: &[Household] = &[
    Household::new("Fofanah", "68137", "13105 Weir St, Omaha, NE 68137", 41.2040, -96.1140),
    Household::new("Garcia", "68135", "17202 Frances St, Omaha, NE 68135", 41.2185, -96.1805),
    Household::new("Haddad", "68144", "12430 Westwood Ln, Omaha, NE 68144", 41.2302, -96.1079),
    Household::new("Ibarra", "68154", "1416 N 120th St, Omaha, NE 68154", 41.2740, -96.1040),
    Household::new("Jensen", "68164", "3102 N 133rd Cir, Omaha, NE 68164", 41.2865, -96.1240),
];

// ============================================================================
// Council Bluffs
// ============================================================================

pub const COUNCIL_BLUFFS: &[Household] = &[
    Household::new("Kowalski", "51501", "215 S 6th St, Council Bluffs, IA 51501", 41.2590, -95.8510),
    Household::new("Larsen", "51503", "1420 N 16th St, Council Bluffs, IA 51503", 41.2750, -95.8290),
];

pub const HOUSEHOLDS: &[Household] = &[
    MIDTOWN[0], MIDTOWN[1], MIDTOWN[2], MIDTOWN[3], MIDTOWN[4],
    WEST[0], WEST[1], WEST[2], WEST[3], WEST[4],
    COUNCIL_BLUFFS[0], COUNCIL_BLUFFS[1],
];

/// Looks up a household by surname.
pub fn household(name: &str) -> &'static Household {
    HOUSEHOLDS
        .iter()
        .find(|household| household.name == name)
        .unwrap_or_else(|| panic!("no household fixture named {}", name))
}
