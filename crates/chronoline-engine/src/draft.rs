//! Parsing of add/edit form input into event data.
//!
//! Forms hand over raw text in [`EventFields`]; [`EventDraft::parse`] turns
//! it into typed values or reports the first field that is wrong.

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::{EventId, EventRecord, Location};

/// Date format used by forms and the JSON documents.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from parsing form input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Start date is required")]
    MissingStart,

    #[error("Invalid {field} date: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid {field}: {value:?} is not a number")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("{field} {value} is out of range")]
    CoordinateOutOfRange { field: &'static str, value: f64 },
}

/// Raw form input, one string per input field.
///
/// Location is flattened into three fields the way the form shows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub image: String,
    pub location_name: String,
    pub lat: String,
    pub lng: String,
}

impl EventFields {
    /// Pre-fill fields from an existing record.
    pub fn from_record(record: &EventRecord) -> Self {
        let (location_name, lat, lng) = match &record.location {
            Some(location) => (
                location.name.clone(),
                location.lat.to_string(),
                location.lng.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            title: record.title.clone(),
            start: record.start.format(DATE_FORMAT).to_string(),
            end: record
                .end
                .map(|end| end.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            description: record.description.clone(),
            image: record.image.clone().unwrap_or_default(),
            location_name,
            lat,
            lng,
        }
    }
}

/// Validated event data without an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub description: String,
    pub image: Option<String>,
    pub location: Option<Location>,
}

impl EventDraft {
    /// Parse raw form input.
    ///
    /// A location is built when any of its three fields is filled in; an
    /// empty coordinate then counts as `0`.
    pub fn parse(fields: &EventFields) -> Result<Self, DraftError> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }

        let start = match parse_date("start", &fields.start)? {
            Some(start) => start,
            None => return Err(DraftError::MissingStart),
        };
        let end = parse_date("end", &fields.end)?;

        let image = Some(fields.image.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let has_location = [&fields.location_name, &fields.lat, &fields.lng]
            .iter()
            .any(|s| !s.trim().is_empty());
        let location = if has_location {
            Some(Location {
                name: fields.location_name.trim().to_string(),
                lat: parse_coordinate("latitude", &fields.lat, 90.0)?,
                lng: parse_coordinate("longitude", &fields.lng, 180.0)?,
            })
        } else {
            None
        };

        Ok(Self {
            title: title.to_string(),
            start,
            end,
            description: fields.description.clone(),
            image,
            location,
        })
    }

    /// Attach an id, producing a full record.
    pub fn into_record(self, id: EventId) -> EventRecord {
        EventRecord {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            description: self.description,
            image: self.image,
            location: self.location,
            links_to: Vec::new(),
        }
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, DraftError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| DraftError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_coordinate(field: &'static str, value: &str, limit: f64) -> Result<f64, DraftError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    let parsed: f64 = value.parse().map_err(|_| DraftError::InvalidCoordinate {
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(DraftError::InvalidCoordinate {
            field,
            value: value.to_string(),
        });
    }
    if parsed.abs() > limit {
        return Err(DraftError::CoordinateOutOfRange {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}
