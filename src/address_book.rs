//! Static postal code to street address table used to label stops that only
//! carry a code.

use crate::distance::postal_code;

/// Locality used when a code has no entry in the table.
pub const DEFAULT_LOCALITY: &str = "Omaha, NE";

/// Representative street address per serviced postal code.
static CODE_ADDRESSES: &[(&str, &str)] = &[
    ("68102", "1234 Dodge St, Omaha, NE 68102"),
    ("68104", "2345 Cuming St, Omaha, NE 68104"),
    ("68105", "3456 Leavenworth St, Omaha, NE 68105"),
    ("68106", "4567 Military Ave, Omaha, NE 68106"),
    ("68107", "5678 L St, Omaha, NE 68107"),
    ("68108", "6789 Fort St, Omaha, NE 68108"),
    ("68110", "7890 N 30th St, Omaha, NE 68110"),
    ("68111", "8901 N 24th St, Omaha, NE 68111"),
    ("68112", "9012 Ames Ave, Omaha, NE 68112"),
    ("68114", "1123 W Center Rd, Omaha, NE 68114"),
    ("68116", "2234 N 16th St, Omaha, NE 68116"),
    ("68117", "3345 S 24th St, Omaha, NE 68117"),
    ("68118", "4456 S 13th St, Omaha, NE 68118"),
    ("68122", "5567 Blondo St, Omaha, NE 68122"),
    ("68124", "6678 Dodge St, Omaha, NE 68124"),
    ("68127", "7789 Q St, Omaha, NE 68127"),
    ("68131", "8890 Pacific St, Omaha, NE 68131"),
    ("68132", "9901 W Dodge Rd, Omaha, NE 68132"),
    ("68134", "1012 N 90th St, Omaha, NE 68134"),
    ("68135", "2123 S 144th St, Omaha, NE 68135"),
    ("68137", "3234 Harrison St, Omaha, NE 68137"),
    ("68144", "4345 S 84th St, Omaha, NE 68144"),
    ("68152", "5456 N 156th St, Omaha, NE 68152"),
    ("68154", "6567 W Center Rd, Omaha, NE 68154"),
    ("68164", "7678 Maple St, Omaha, NE 68164"),
    ("51501", "5678 Main St, Council Bluffs, IA 51501"),
    ("51503", "1234 Broadway, Council Bluffs, IA 51503"),
    ("51546", "9012 Oak St, Council Bluffs, IA 51546"),
];

#[derive(Debug, Clone)]
pub struct AddressBook {
    locality: String,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALITY)
    }
}

impl AddressBook {
    pub fn new(locality: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
        }
    }

    /// Table entry for `code`, if it is a serviced code.
    pub fn lookup(&self, code: &str) -> Option<&'static str> {
        let key = postal_code(code);
        CODE_ADDRESSES
            .iter()
            .find(|(entry, _)| *entry == key)
            .map(|(_, address)| *address)
    }

    /// Street address for `code`, or `"{locality} {code}"` when unknown.
    pub fn resolve(&self, code: &str) -> String {
        match self.lookup(code) {
            Some(address) => address.to_string(),
            None => format!("{} {}", self.locality, postal_code(code)),
        }
    }
}
