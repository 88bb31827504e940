//! Operators and their factories
//!
//! Every factory captures its configuration and returns an [`Operator`]: a
//! kind tag plus a pure `Collection -> Collection` function. Operators hold
//! no state between invocations and can be reused across queries.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::kind::OperatorKind;
use super::record::{copy_record, Collection, Record};
use super::sorter::{records_equal, sort_records, values_equal, SortOrder};

type ApplyFn = dyn Fn(Collection) -> Collection + Send + Sync;

/// Shared value transform used by `format`
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A configured transformation from one collection to another
#[derive(Clone)]
pub struct Operator {
    kind: OperatorKind,
    description: String,
    apply: Arc<ApplyFn>,
}

impl Operator {
    fn new<F>(kind: OperatorKind, description: String, apply: F) -> Self
    where
        F: Fn(Collection) -> Collection + Send + Sync + 'static,
    {
        Self {
            kind,
            description,
            apply: Arc::new(apply),
        }
    }

    /// Returns the operator kind
    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    /// Returns the execution rank of this operator's kind
    pub fn rank(&self) -> usize {
        self.kind.rank()
    }

    /// Human-readable configuration, used by explain output and logs
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Applies the operator to a collection
    pub fn apply(&self, records: Collection) -> Collection {
        (self.apply)(records)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.description)
    }
}

/// Projects each record down to the named fields that exist on it.
///
/// Fields absent from a record are omitted, never inserted as null.
pub fn select<I, S>(fields: I) -> Operator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    let description = fields.join(", ");

    Operator::new(OperatorKind::Select, description, move |records| {
        records
            .into_iter()
            .map(|record| {
                let mut projected = Record::new();
                for field in &fields {
                    if let Some(value) = record.get(field) {
                        projected.insert(field.clone(), value.clone());
                    }
                }
                projected
            })
            .collect()
    })
}

/// Keeps records whose `field` value is one of `values`.
///
/// Numbers match by value, so `1` and `1.0` are the same member. A record
/// without the field never matches.
pub fn filter_in<I>(field: impl Into<String>, values: I) -> Operator
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let field = field.into();
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    let description = format!("{} in {}", field, Value::Array(values.clone()));

    Operator::new(OperatorKind::FilterIn, description, move |records| {
        records
            .into_iter()
            .filter(|record| {
                record
                    .get(&field)
                    .is_some_and(|v| values.iter().any(|allowed| values_equal(allowed, v)))
            })
            .collect()
    })
}

/// Stable sort on one field
pub fn sort_by(field: impl Into<String>, order: SortOrder) -> Operator {
    let field = field.into();
    let description = format!("{} {}", field, order);

    Operator::new(OperatorKind::SortBy, description, move |mut records| {
        sort_records(&mut records, &field, order);
        records
    })
}

/// Replaces `field` with `transform(value)` on a copy of each record.
///
/// A record missing the field gets `transform(null)` under that key.
pub fn format<F>(field: impl Into<String>, transform: F) -> Operator
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    format_with(field, Arc::new(transform))
}

/// Like [`format`], with an already shared transform
pub fn format_with(field: impl Into<String>, transform: Transform) -> Operator {
    let field = field.into();
    let description = field.clone();

    Operator::new(OperatorKind::Format, description, move |records| {
        records
            .iter()
            .map(|record| {
                let mut copy = copy_record(record);
                let formatted = transform(copy.get(&field).unwrap_or(&Value::Null));
                copy.insert(field.clone(), formatted);
                copy
            })
            .collect()
    })
}

/// Keeps the first `count` records
pub fn limit(count: usize) -> Operator {
    Operator::new(OperatorKind::Limit, count.to_string(), move |mut records| {
        records.truncate(count);
        records
    })
}

/// Union of operators.
///
/// Each operator sees the same snapshot: the collection as it stands when
/// `or` runs. Matched snapshot records come first in snapshot order,
/// followed by branch output not present in the snapshot. Records equal under
/// [`records_equal`] appear once.
pub fn or<I>(operators: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let operators: Vec<Operator> = operators.into_iter().collect();
    let description = describe_children(&operators, " | ");

    Operator::new(OperatorKind::Or, description, move |records| {
        let branches: Vec<Collection> = operators
            .iter()
            .map(|op| op.apply(records.clone()))
            .collect();

        let mut union = Collection::new();
        for record in records {
            let matched = branches.iter().any(|branch| contains_record(branch, &record));
            if matched && !contains_record(&union, &record) {
                union.push(record);
            }
        }
        for record in branches.into_iter().flatten() {
            if !contains_record(&union, &record) {
                union.push(record);
            }
        }
        union
    })
}

/// Intersection of operators.
///
/// Operators run in the order given, each narrowing the previous result.
pub fn and<I>(operators: I) -> Operator
where
    I: IntoIterator<Item = Operator>,
{
    let operators: Vec<Operator> = operators.into_iter().collect();
    let description = describe_children(&operators, " & ");

    Operator::new(OperatorKind::And, description, move |records| {
        operators.iter().fold(records, |acc, op| op.apply(acc))
    })
}

fn contains_record(records: &[Record], record: &Record) -> bool {
    records.iter().any(|candidate| records_equal(candidate, record))
}

fn describe_children(operators: &[Operator], separator: &str) -> String {
    operators
        .iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::record::collection_from_value;
    use serde_json::json;

    fn records(value: Value) -> Collection {
        collection_from_value(value)
    }

    #[test]
    fn test_select_omits_absent_fields() {
        let input = records(json!([{"a": 1, "b": 2, "c": 3}, {"a": 3}]));
        let output = select(["a", "b"]).apply(input);

        assert_eq!(output, records(json!([{"a": 1, "b": 2}, {"a": 3}])));
        assert!(!output[1].contains_key("b"));
    }

    #[test]
    fn test_filter_in_keeps_relative_order() {
        let input = records(json!([
            {"country": "FR"}, {"country": "US"}, {"country": "DE"}
        ]));
        let output = filter_in("country", ["FR", "DE"]).apply(input);

        assert_eq!(output, records(json!([{"country": "FR"}, {"country": "DE"}])));
    }

    #[test]
    fn test_filter_in_missing_field() {
        let input = records(json!([{"a": 1}, {"b": 1}]));
        let output = filter_in("a", [json!(1), json!(null)]).apply(input);

        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_filter_in_matches_numbers_by_value() {
        let input = records(json!([{"n": 1}, {"n": 2.0}, {"n": 3}]));
        let output = filter_in("n", [json!(1.0), json!(2)]).apply(input);

        assert_eq!(output, records(json!([{"n": 1}, {"n": 2.0}])));
    }

    #[test]
    fn test_filter_in_no_type_coercion() {
        let input = records(json!([{"n": 1}, {"n": "1"}]));
        let output = filter_in("n", [1]).apply(input);

        assert_eq!(output, records(json!([{"n": 1}])));
    }

    #[test]
    fn test_sort_by() {
        let input = records(json!([{"n": 3}, {"n": 1}, {"n": 2}]));

        let asc = sort_by("n", SortOrder::Asc).apply(input.clone());
        assert_eq!(asc, records(json!([{"n": 1}, {"n": 2}, {"n": 3}])));

        let desc = sort_by("n", SortOrder::Desc).apply(input);
        assert_eq!(desc, records(json!([{"n": 3}, {"n": 2}, {"n": 1}])));
    }

    #[test]
    fn test_limit() {
        let input = records(json!([{"i": 1}, {"i": 2}, {"i": 3}, {"i": 4}, {"i": 5}]));

        assert_eq!(limit(2).apply(input.clone()), records(json!([{"i": 1}, {"i": 2}])));
        assert_eq!(limit(10).apply(input.clone()).len(), 5);
        assert!(limit(0).apply(input).is_empty());
    }

    #[test]
    fn test_format_targets_one_field() {
        let input = records(json!([{"price": 10, "name": "a"}]));
        let double = format("price", |v| json!(v.as_i64().unwrap_or(0) * 2));

        assert_eq!(double.apply(input), records(json!([{"price": 20, "name": "a"}])));
    }

    #[test]
    fn test_format_fills_missing_field() {
        let input = records(json!([{"name": "a"}, {"name": "b", "price": 4}]));
        let output = format("price", |v| {
            if v.is_null() {
                json!("n/a")
            } else {
                v.clone()
            }
        })
        .apply(input);

        assert_eq!(
            output,
            records(json!([{"name": "a", "price": "n/a"}, {"name": "b", "price": 4}]))
        );
    }

    #[test]
    fn test_or_union_dedup() {
        let input = records(json!([{"a": 1, "b": 0}, {"a": 0, "b": 2}, {"a": 9, "b": 9}, {"a": 1, "b": 2}]));
        let op = or([filter_in("a", [1]), filter_in("b", [2])]);

        let output = op.apply(input);
        assert_eq!(
            output,
            records(json!([{"a": 1, "b": 0}, {"a": 0, "b": 2}, {"a": 1, "b": 2}]))
        );
    }

    #[test]
    fn test_or_keeps_snapshot_order() {
        let input = records(json!([{"a": 1, "b": 0}, {"a": 0, "b": 2}]));
        let op = or([filter_in("b", [2]), filter_in("a", [1])]);

        assert_eq!(op.apply(input.clone()), input);
    }

    #[test]
    fn test_or_removes_structural_duplicates() {
        let input = records(json!([{"a": 1}, {"a": 1}]));
        let op = or([filter_in("a", [1])]);

        assert_eq!(op.apply(input).len(), 1);
    }

    #[test]
    fn test_or_dedups_numbers_by_value() {
        let input = records(json!([{"a": 1}, {"a": 1.0}]));
        let op = or([filter_in("a", [json!(1), json!(1.0)])]);

        assert_eq!(op.apply(input), records(json!([{"a": 1}])));
    }

    #[test]
    fn test_or_appends_reshaped_branch_output() {
        let input = records(json!([{"a": 1, "b": 2}, {"a": 3}]));
        let op = or([filter_in("a", [3]), select(["a"])]);

        // {"a": 3} is in the snapshot; {"a": 1} only exists in the select branch
        assert_eq!(op.apply(input), records(json!([{"a": 3}, {"a": 1}])));
    }

    #[test]
    fn test_or_empty_is_empty() {
        let input = records(json!([{"a": 1}]));
        assert!(or(Vec::new()).apply(input).is_empty());
    }

    #[test]
    fn test_and_intersection() {
        let input = records(json!([{"a": 1, "b": 0}, {"a": 0, "b": 2}, {"a": 1, "b": 2}]));
        let op = and([filter_in("a", [1]), filter_in("b", [2])]);

        assert_eq!(op.apply(input), records(json!([{"a": 1, "b": 2}])));
    }

    #[test]
    fn test_and_empty_is_identity() {
        let input = records(json!([{"a": 1}]));
        assert_eq!(and(Vec::new()).apply(input.clone()), input);
    }

    #[test]
    fn test_operator_is_reusable() {
        let op = filter_in("a", [1]);
        let input = records(json!([{"a": 1}, {"a": 2}]));

        assert_eq!(op.apply(input.clone()), op.apply(input));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(select(["a", "b"]).description(), "a, b");
        assert_eq!(filter_in("c", ["FR"]).description(), "c in [\"FR\"]");
        assert_eq!(sort_by("n", SortOrder::Desc).description(), "n desc");
        assert_eq!(limit(3).to_string(), "limit(3)");
        assert_eq!(
            or([filter_in("a", [1]), filter_in("b", [2])]).description(),
            "filterIn(a in [1]) | filterIn(b in [2])"
        );
    }
}
