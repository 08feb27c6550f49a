//! CSV ingestion with an explicit header mapping.
//!
//! Headers are matched by name (trimmed, case-insensitive), never guessed.
//! A missing required header fails the whole load up front instead of
//! surfacing later as empty fields.

use std::io::Read;

use chrono::Months;
use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

use crate::dates::{format_date, parse_date, parse_timestamp};
use crate::model::{ClientRequest, RequestKind};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Header names of the delivery intake sheet.
///
/// `geo_code`, `preferences` and `timestamp` are required; the rest may be
/// absent from the sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryColumns {
    pub name: String,
    pub geo_code: String,
    pub street_address: String,
    pub phone: String,
    pub comments: String,
    /// Preference columns in rank order.
    pub preferences: Vec<String>,
    pub timestamp: String,
    pub scheduled: String,
}

impl Default for DeliveryColumns {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            geo_code: "Zip Code".to_string(),
            street_address: "Address".to_string(),
            phone: "Phone".to_string(),
            comments: "Comments".to_string(),
            preferences: ["1st Choice", "2nd Choice", "3rd Choice", "4th Choice"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            timestamp: "Timestamp".to_string(),
            scheduled: "Scheduled Date".to_string(),
        }
    }
}

/// Header names of the pickup intake sheet.
///
/// `geo_code` and `street_address` are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickupColumns {
    pub name: String,
    pub street_address: String,
    pub geo_code: String,
    pub phone: String,
    pub items: String,
    pub timestamp: String,
    pub scheduled: String,
}

impl Default for PickupColumns {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            street_address: "Pick Up Address".to_string(),
            geo_code: "Zip Code".to_string(),
            phone: "Phone Number".to_string(),
            items: "Please list items".to_string(),
            timestamp: "Timestamp".to_string(),
            scheduled: "Scheduled Date".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Shifts dates forward by whole months and clears scheduled dates, so
    /// an old export can be replayed as a fresh backlog.
    pub months_offset: u32,
}

struct Headers(StringRecord);

impl Headers {
    fn optional(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.0
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize, IngestError> {
        self.optional(name)
            .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
    }
}

fn field(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn csv_reader<Rd: Read>(reader: Rd) -> csv::Reader<Rd> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Normalizes a preference date to `M/D/YYYY`, shifted by `months`.
/// Text that is not a date is kept as-is.
fn normalize_preference(value: &str, months: u32) -> String {
    let value = value.trim();
    match parse_date(value) {
        Some(date) => format_date(date.checked_add_months(Months::new(months)).unwrap_or(date)),
        None => value.to_string(),
    }
}

fn shift_timestamp(value: String, months: u32) -> String {
    if months == 0 {
        return value;
    }
    match parse_timestamp(&value).and_then(|at| at.checked_add_months(Months::new(months))) {
        Some(shifted) => shifted.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => value,
    }
}

fn scheduled(record: &StringRecord, column: Option<usize>, options: &IngestOptions) -> Option<String> {
    if options.months_offset > 0 {
        return None;
    }
    field(record, column)
}

/// Reads delivery requests. Row indexes start at 0 after the header.
pub fn load_deliveries<Rd: Read>(
    reader: Rd,
    columns: &DeliveryColumns,
    options: &IngestOptions,
) -> Result<Vec<ClientRequest>, IngestError> {
    let mut csv = csv_reader(reader);
    let headers = Headers(csv.headers()?.clone());

    let geo_code = headers.require(&columns.geo_code)?;
    let timestamp = headers.require(&columns.timestamp)?;
    let preferences = columns
        .preferences
        .iter()
        .map(|name| headers.require(name))
        .collect::<Result<Vec<_>, _>>()?;
    let name = headers.optional(&columns.name);
    let street_address = headers.optional(&columns.street_address);
    let phone = headers.optional(&columns.phone);
    let comments = headers.optional(&columns.comments);
    let scheduled_column = headers.optional(&columns.scheduled);

    let mut requests = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        requests.push(ClientRequest {
            index,
            kind: RequestKind::Delivery,
            name: field(&record, name),
            geo_code: field(&record, Some(geo_code)),
            street_address: field(&record, street_address),
            contact: field(&record, phone),
            notes: field(&record, comments),
            // Blank slots stay in place so ranks keep their position.
            date_preferences: preferences
                .iter()
                .map(|&column| normalize_preference(record.get(column).unwrap_or(""), options.months_offset))
                .collect(),
            submitted_at: field(&record, Some(timestamp))
                .map(|value| shift_timestamp(value, options.months_offset)),
            scheduled_date: scheduled(&record, scheduled_column, options),
        });
    }

    tracing::info!(rows = requests.len(), "loaded delivery requests");
    Ok(requests)
}

/// Reads pickup requests. Row indexes start at 0 after the header.
pub fn load_pickups<Rd: Read>(
    reader: Rd,
    columns: &PickupColumns,
    options: &IngestOptions,
) -> Result<Vec<ClientRequest>, IngestError> {
    let mut csv = csv_reader(reader);
    let headers = Headers(csv.headers()?.clone());

    let geo_code = headers.require(&columns.geo_code)?;
    let street_address = headers.require(&columns.street_address)?;
    let name = headers.optional(&columns.name);
    let phone = headers.optional(&columns.phone);
    let items = headers.optional(&columns.items);
    let timestamp = headers.optional(&columns.timestamp);
    let scheduled_column = headers.optional(&columns.scheduled);

    let mut requests = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        requests.push(ClientRequest {
            index,
            kind: RequestKind::Pickup,
            name: field(&record, name),
            geo_code: field(&record, Some(geo_code)),
            street_address: field(&record, Some(street_address)),
            contact: field(&record, phone),
            notes: field(&record, items),
            date_preferences: Vec::new(),
            submitted_at: field(&record, timestamp)
                .map(|value| shift_timestamp(value, options.months_offset)),
            scheduled_date: scheduled(&record, scheduled_column, options),
        });
    }

    tracing::info!(rows = requests.len(), "loaded pickup requests");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Request;

    const DELIVERIES: &str = "\
Timestamp,Name,Zip Code,1st Choice,2nd Choice,3rd Choice,4th Choice,Phone,Comments,Scheduled Date
3/1/2024 10:15:00,Ana,68104,3/15/24,,2024-03-20,3/22/2024,402-555-0101,Second floor,
3/2/2024 09:00:00,Ben,68137 NE,3/16/2024,3/15/2024,,,,,3/10/2024
";

    #[test]
    fn test_load_deliveries_maps_and_normalizes() {
        let requests =
            load_deliveries(DELIVERIES.as_bytes(), &DeliveryColumns::default(), &IngestOptions::default()).unwrap();

        assert_eq!(requests.len(), 2);
        let ana = &requests[0];
        assert_eq!(ana.index, 0);
        assert_eq!(ana.display_name(), Some("Ana"));
        assert_eq!(
            ana.date_preferences,
            vec!["3/15/2024", "", "3/20/2024", "3/22/2024"]
        );
        assert_eq!(ana.contact(), Some("402-555-0101"));
        assert!(ana.is_unscheduled());

        let ben = &requests[1];
        assert_eq!(ben.geo_code(), Some("68137 NE"));
        assert_eq!(ben.scheduled_date(), Some("3/10/2024"));
        assert_eq!(ben.contact(), None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Timestamp,Name,1st Choice,2nd Choice,3rd Choice,4th Choice\n";
        let err = load_deliveries(csv.as_bytes(), &DeliveryColumns::default(), &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref column) if column == "Zip Code"));
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let csv = "timestamp , zip code,1ST CHOICE,2nd choice,3rd Choice,4th Choice\n3/1/2024,68104,3/15/2024,,,\n";
        let requests =
            load_deliveries(csv.as_bytes(), &DeliveryColumns::default(), &IngestOptions::default()).unwrap();
        assert_eq!(requests[0].geo_code(), Some("68104"));
        assert_eq!(requests[0].display_name(), None);
    }

    #[test]
    fn test_months_offset_shifts_and_clears_schedule() {
        let options = IngestOptions { months_offset: 2 };
        let requests = load_deliveries(DELIVERIES.as_bytes(), &DeliveryColumns::default(), &options).unwrap();

        assert_eq!(requests[0].date_preferences[0], "5/15/2024");
        assert_eq!(requests[0].submitted_at(), Some("2024-05-01 10:15:00"));
        assert!(requests[1].is_unscheduled());
    }

    #[test]
    fn test_load_pickups() {
        let csv = "\
Timestamp,Name,Pick Up Address,Zip Code,Phone Number,Please list items,Scheduled Date
3/3/2024,Cal,77 Elm St,68105,402-555-0199,Couch,
3/4/2024,,12 Oak Ave,,,,3/9/2024
";
        let pickups = load_pickups(csv.as_bytes(), &PickupColumns::default(), &IngestOptions::default()).unwrap();

        assert_eq!(pickups.len(), 2);
        assert_eq!(pickups[0].kind, RequestKind::Pickup);
        assert_eq!(pickups[0].street_address(), Some("77 Elm St"));
        assert_eq!(pickups[0].notes(), Some("Couch"));
        assert_eq!(pickups[1].geo_code(), None);
        assert!(!pickups[1].is_unscheduled());
    }

    #[test]
    fn test_pickups_require_address_column() {
        let csv = "Name,Zip Code\nCal,68105\n";
        let err = load_pickups(csv.as_bytes(), &PickupColumns::default(), &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref column) if column == "Pick Up Address"));
    }
}
