//! Timeline entities
//!
//! A `TimelineEntry` is parsed from one note's metadata. Aggregation into
//! named timelines happens in `domain::services::timeline_aggregator`.

use serde::{Serialize, Serializer};

use crate::domain::value_objects::{CalendarDate, NormalizedKey};

/// Where an entry's image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryImage {
    /// A file in the vault
    Vault(NormalizedKey),
    /// An external URL, kept verbatim
    External(String),
}

impl EntryImage {
    pub fn vault_path(&self) -> Option<&NormalizedKey> {
        match self {
            EntryImage::Vault(key) => Some(key),
            EntryImage::External(_) => None,
        }
    }
}

impl Serialize for EntryImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryImage::Vault(key) => serializer.serialize_str(key.as_str()),
            EntryImage::External(url) => serializer.serialize_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub note_path: NormalizedKey,
    pub title: String,
    pub summary: String,
    pub start: CalendarDate,
    pub end: Option<CalendarDate>,
    pub timeline_names: Vec<String>,
    pub image: Option<EntryImage>,
    /// Modification fingerprint of the note at scan time
    pub fingerprint: u64,
}

/// One formatted row of a timeline artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    pub note: NormalizedKey,
    pub title: String,
    pub summary: String,
    pub start: CalendarDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<CalendarDate>,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EntryImage>,
    pub sort_key: i64,
}

/// A named timeline ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub name: String,
    pub months: Vec<String>,
    pub entries: Vec<TimelineRow>,
    /// Combined fingerprint of every member note and the month table
    #[serde(skip)]
    pub fingerprint: u64,
}
