//! Bundled request record produced by the ingestion adapter.

use serde::{Deserialize, Serialize};

use crate::traits::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Delivery,
    Pickup,
}

/// A single intake row with its columns already mapped to fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    /// Row index in the source sheet.
    pub index: usize,
    pub kind: RequestKind,
    pub name: Option<String>,
    pub geo_code: Option<String>,
    pub street_address: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub date_preferences: Vec<String>,
    pub submitted_at: Option<String>,
    pub scheduled_date: Option<String>,
}

impl ClientRequest {
    pub fn new(index: usize, kind: RequestKind) -> Self {
        Self {
            index,
            kind,
            name: None,
            geo_code: None,
            street_address: None,
            contact: None,
            notes: None,
            date_preferences: Vec::new(),
            submitted_at: None,
            scheduled_date: None,
        }
    }

    pub fn delivery(index: usize) -> Self {
        Self::new(index, RequestKind::Delivery)
    }

    pub fn pickup(index: usize) -> Self {
        Self::new(index, RequestKind::Pickup)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.geo_code = Some(code.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.street_address = Some(address.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn prefers(mut self, date: impl Into<String>) -> Self {
        self.date_preferences.push(date.into());
        self
    }

    pub fn submitted(mut self, timestamp: impl Into<String>) -> Self {
        self.submitted_at = Some(timestamp.into());
        self
    }

    pub fn scheduled_on(mut self, date: impl Into<String>) -> Self {
        self.scheduled_date = Some(date.into());
        self
    }
}

impl Request for ClientRequest {
    type Id = usize;

    fn id(&self) -> &Self::Id {
        &self.index
    }

    fn geo_code(&self) -> Option<&str> {
        self.geo_code.as_deref()
    }

    fn date_preferences(&self) -> &[String] {
        &self.date_preferences
    }

    fn submitted_at(&self) -> Option<&str> {
        self.submitted_at.as_deref()
    }

    fn scheduled_date(&self) -> Option<&str> {
        self.scheduled_date.as_deref()
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn street_address(&self) -> Option<&str> {
        self.street_address.as_deref()
    }

    fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
