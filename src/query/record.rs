//! Record and collection types
//!
//! A record is a flat mapping of field name to scalar value. Collections are
//! plain vectors of records and are never mutated in place by an operator.

use serde_json::{Map, Value};

/// A single record: field name to value
pub type Record = Map<String, Value>;

/// An ordered sequence of records
pub type Collection = Vec<Record>;

/// Copies every record of a collection into fresh maps.
///
/// Values are cloned, so later stages never observe caller-owned state.
pub fn copy_collection(records: &[Record]) -> Collection {
    records.iter().map(copy_record).collect()
}

/// Copies all key/value pairs of a record into a new map
pub fn copy_record(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Builds a record from a JSON object value.
///
/// Returns `None` if the value is not an object.
pub fn record_from_value(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Builds a collection from a JSON array of objects.
///
/// Non-object elements are skipped.
pub fn collection_from_value(value: Value) -> Collection {
    match value {
        Value::Array(items) => items.into_iter().filter_map(record_from_value).collect(),
        other => record_from_value(other).into_iter().collect(),
    }
}
