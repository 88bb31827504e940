//! Record ordering for `sortBy`
//!
//! Comparison is a total order over JSON values so that sorting never
//! faults on mixed or missing fields.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::errors::QueryError;
use super::record::Record;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Sorts records in place by one field.
///
/// The sort is stable: records with equal keys keep their relative order.
pub fn sort_records(records: &mut [Record], field: &str, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Compares two optional JSON values.
///
/// Ordering rules:
/// - missing < null < bool < number < string < array < object
/// - same type: natural ordering (arrays and objects compare equal)
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => compare_numbers(a_n, b_n),
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}

/// Equality that agrees with [`compare_values`] on numbers.
///
/// `1` and `1.0` are the same number. Arrays compare element-wise and
/// objects key by key, using the same rule for nested numbers.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a_n), Value::Number(b_n)) => compare_numbers(a_n, b_n) == Ordering::Equal,
        (Value::Array(a_items), Value::Array(b_items)) => {
            a_items.len() == b_items.len()
                && a_items.iter().zip(b_items).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a_map), Value::Object(b_map)) => records_equal(a_map, b_map),
        _ => a == b,
    }
}

/// Structural record equality under [`values_equal`]
pub fn records_equal(a: &Record, b: &Record) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    // Integers compare exactly; anything else through f64
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return ai.cmp(&bi);
    }
    if let (Some(au), Some(bu)) = (a.as_u64(), b.as_u64()) {
        return au.cmp(&bu);
    }
    let a_f = a.as_f64().unwrap_or(0.0);
    let b_f = b.as_f64().unwrap_or(0.0);
    if a_f == b_f {
        // 0 and -0.0 are the same number
        return Ordering::Equal;
    }
    a_f.total_cmp(&b_f)
}

fn type_order(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::record::collection_from_value;
    use serde_json::json;

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut records = collection_from_value(json!([
            {"id": "c", "age": 30}, {"id": "a", "age": 20}, {"id": "b", "age": 25}
        ]));

        sort_records(&mut records, "age", SortOrder::Asc);

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut records = collection_from_value(json!([
            {"id": "c", "age": 30}, {"id": "a", "age": 20}, {"id": "b", "age": 25}
        ]));

        sort_records(&mut records, "age", SortOrder::Desc);

        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut records = collection_from_value(json!([
            {"id": "a", "age": 25}, {"id": "b", "age": 25}, {"id": "c", "age": 25}
        ]));

        sort_records(&mut records, "age", SortOrder::Desc);

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_by_string() {
        let mut records = collection_from_value(json!([
            {"id": "1", "name": "charlie"},
            {"id": "2", "name": "alice"},
            {"id": "3", "name": "bob"}
        ]));

        sort_records(&mut records, "name", SortOrder::Asc);

        assert_eq!(ids(&records), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_mixed_numbers() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10.5))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(-3)), Some(&json!(-3))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_missing_sorts_first() {
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&json!(1)), Some(&json!("1"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_values_equal_across_number_forms() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(0), &json!(-0.0)));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(2.0))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_values_equal_nested() {
        assert!(values_equal(&json!([1, {"a": 2}]), &json!([1.0, {"a": 2.0}])));
        assert!(!values_equal(&json!([1, 2]), &json!([1])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 1})));
        assert!(!values_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn test_records_equal() {
        let left = collection_from_value(json!([{"id": "x", "n": 3}]));
        let right = collection_from_value(json!([{"n": 3.0, "id": "x"}]));

        assert!(records_equal(&left[0], &right[0]));
    }

    #[test]
    fn test_parse_sort_order() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!(
            "up".parse::<SortOrder>(),
            Err(QueryError::InvalidSortOrder("up".into()))
        );
    }
}
