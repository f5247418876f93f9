//! Shape checks for imported and stored event records.
//!
//! Imported documents come from anywhere, so each element is checked
//! against the record shape before it is deserialized. The stored list is
//! held to the same rules when the store opens.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::draft::DATE_FORMAT;
use crate::record::EventRecord;

/// Problems found in one element of an imported array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    /// Position in the imported array.
    pub index: usize,
    /// The element's id, when it had a usable one.
    pub id: Option<String>,
    pub problems: Vec<String>,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index + 1)?;
        if let Some(id) = &self.id {
            write!(f, " (id {id})")?;
        }
        write!(f, ": {}", self.problems.join("; "))
    }
}

/// Check every element, returning the valid records and the issues.
///
/// Duplicate ids are reported on every element after the first one.
pub fn check_records(values: Vec<Value>) -> (Vec<EventRecord>, Vec<RecordIssue>) {
    let mut records = Vec::with_capacity(values.len());
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        match check_record(value) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    issues.push(RecordIssue {
                        index,
                        id: Some(record.id.to_string()),
                        problems: vec!["duplicate id".to_string()],
                    });
                }
            }
            Err((id, problems)) => issues.push(RecordIssue {
                index,
                id,
                problems,
            }),
        }
    }

    (records, issues)
}

/// Re-check records loaded from storage with the import rules.
///
/// Returns the records when every one passes, otherwise all the issues.
pub fn check_stored(records: &[EventRecord]) -> Result<Vec<EventRecord>, Vec<RecordIssue>> {
    let mut values = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match serde_json::to_value(record) {
            Ok(value) => values.push(value),
            Err(e) => {
                return Err(vec![RecordIssue {
                    index,
                    id: Some(record.id.to_string()),
                    problems: vec![e.to_string()],
                }])
            }
        }
    }

    let (valid, issues) = check_records(values);
    if issues.is_empty() {
        Ok(valid)
    } else {
        Err(issues)
    }
}

/// Check and deserialize a single element.
///
/// Numeric ids are accepted and turned into strings; an empty `end` string
/// reads as absent.
pub fn check_record(value: Value) -> Result<EventRecord, (Option<String>, Vec<String>)> {
    let Value::Object(mut object) = value else {
        return Err((None, vec!["not an object".to_string()]));
    };

    let mut problems = Vec::new();

    let id = match object.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            problems.push("id must be a non-empty string".to_string());
            None
        }
        None => {
            problems.push("missing id".to_string());
            None
        }
    };
    if let Some(id) = &id {
        object.insert("id".to_string(), Value::String(id.clone()));
    }

    match object.get("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::String(_)) => problems.push("title is empty".to_string()),
        Some(_) => problems.push("title must be a string".to_string()),
        None => problems.push("missing title".to_string()),
    }

    match object.get("start") {
        Some(Value::String(s)) => check_date("start", s, &mut problems),
        Some(_) => problems.push("start must be a date string".to_string()),
        None => problems.push("missing start".to_string()),
    }

    match object.get("end") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if s.trim().is_empty() => {
            object.insert("end".to_string(), Value::Null);
        }
        Some(Value::String(s)) => check_date("end", s, &mut problems),
        Some(_) => problems.push("end must be a date string or null".to_string()),
    }

    for field in ["description", "image"] {
        match object.get(field) {
            None | Some(Value::Null | Value::String(_)) => {}
            Some(_) => problems.push(format!("{field} must be a string")),
        }
    }
    if object.get("description") == Some(&Value::Null) {
        object.remove("description");
    }

    match object.get("location") {
        None | Some(Value::Null) => {}
        Some(Value::Object(location)) => check_location(location, &mut problems),
        Some(_) => problems.push("location must be an object or null".to_string()),
    }

    match object.get("linksTo") {
        None | Some(Value::Null) => {
            object.remove("linksTo");
        }
        Some(Value::Array(links)) if links.iter().all(Value::is_string) => {}
        Some(_) => problems.push("linksTo must be an array of ids".to_string()),
    }

    if !problems.is_empty() {
        return Err((id, problems));
    }

    serde_json::from_value(Value::Object(object)).map_err(|e| (id, vec![e.to_string()]))
}

fn check_date(field: &str, value: &str, problems: &mut Vec<String>) {
    if NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).is_err() {
        problems.push(format!("{field} {value:?} is not a YYYY-MM-DD date"));
    }
}

fn check_location(location: &Map<String, Value>, problems: &mut Vec<String>) {
    match location.get("name") {
        Some(Value::String(_)) => {}
        _ => problems.push("location.name must be a string".to_string()),
    }

    for (key, alias, limit) in [("lat", "latitude", 90.0), ("lng", "longitude", 180.0)] {
        let value = location.get(key).or_else(|| location.get(alias));
        match value.and_then(Value::as_f64) {
            Some(n) if n.abs() <= limit => {}
            Some(n) => problems.push(format!("location.{key} {n} is out of range")),
            None => problems.push(format!("location.{key} must be a number")),
        }
    }
}
