//! Event record model.
//!
//! An [`EventRecord`] is the only persisted entity: one entry on the
//! timeline with optional description, image reference and location.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, immutable identifier of an event record.
///
/// New ids are the creation timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from a creation instant.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A named geographic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,

    pub title: String,

    pub start: NaiveDate,

    /// Conventionally on or after `start`; not enforced.
    #[serde(default)]
    pub end: Option<NaiveDate>,

    #[serde(default)]
    pub description: String,

    /// Image URL or path. An empty string reads as absent.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub location: Option<Location>,

    /// Reserved for linking related events; never populated.
    #[serde(default, rename = "linksTo")]
    pub links_to: Vec<EventId>,
}

impl EventRecord {
    /// Create a record with only the required fields set.
    pub fn new(id: EventId, title: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            start,
            end: None,
            description: String::new(),
            image: None,
            location: None,
            links_to: Vec::new(),
        }
    }

    /// The last day the event covers (`end` if present, otherwise `start`).
    pub fn last_day(&self) -> NaiveDate {
        self.end.filter(|end| *end >= self.start).unwrap_or(self.start)
    }

    /// Whether the event spans more than a single day.
    pub fn is_range(&self) -> bool {
        self.last_day() > self.start
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
