//! Query evaluator
//!
//! Evaluation flow (strict order):
//! 1. Copy every input record
//! 2. Stable-sort operators by kind rank
//! 3. Fold the copy through the ordered operators
//! 4. Return the final collection
//!
//! Operators of the same kind keep the order the caller wrote them in;
//! only cross-kind order is rearranged.

use serde::Serialize;

use crate::observability::{trace_event, Event, Logger, ObservationScope};

use super::config::QueryConfig;
use super::explain::ExplainPlan;
use super::kind::OperatorKind;
use super::operator::Operator;
use super::record::{copy_collection, Collection, Record};

/// Sorts operators into canonical execution order.
///
/// The sort is stable, so same-kind operators keep their relative order.
pub fn ordered<I>(operators: I) -> Vec<Operator>
where
    I: IntoIterator<Item = Operator>,
{
    let mut operators: Vec<Operator> = operators.into_iter().collect();
    operators.sort_by_key(Operator::rank);
    operators
}

/// Runs `operators` over a copy of `records`.
///
/// The input is never modified. With no operators the copy is returned
/// unchanged.
pub fn query<I>(records: &[Record], operators: I) -> Collection
where
    I: IntoIterator<Item = Operator>,
{
    ordered(operators)
        .iter()
        .fold(copy_collection(records), |acc, op| op.apply(acc))
}

/// Variadic form of [`query`](crate::query::query).
///
/// ```
/// use recquery::query::{filter_in, limit, sort_by, SortOrder};
/// use serde_json::json;
///
/// let people = recquery::query::collection_from_value(json!([
///     {"name": "Ann", "age": 31},
///     {"name": "Bob", "age": 24},
///     {"name": "Cid", "age": 45},
/// ]));
///
/// let result = recquery::query!(
///     people,
///     limit(1),
///     sort_by("age", SortOrder::Desc),
///     filter_in("name", ["Ann", "Bob"]),
/// );
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0]["name"], "Ann");
/// ```
#[macro_export]
macro_rules! query {
    ($records:expr $(, $op:expr)* $(,)?) => {
        $crate::query::query(&$records[..], ::std::vec![$($op),*])
    };
}

/// Row counts for one applied operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageStats {
    /// Operator kind
    pub kind: OperatorKind,
    /// Operator configuration
    pub description: String,
    /// Records entering the stage
    pub rows_in: usize,
    /// Records leaving the stage
    pub rows_out: usize,
}

/// Result of a query with per-stage statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Records in result order
    pub records: Collection,
    /// One entry per operator, in execution order
    pub stages: Vec<StageStats>,
}

impl QueryOutcome {
    /// Returns true if no records survived
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of result records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns an iterator over the result records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Consumes the outcome, returning the records
    pub fn into_records(self) -> Collection {
        self.records
    }
}

/// Query builder over a borrowed collection
#[derive(Debug, Clone)]
pub struct Query<'a> {
    records: &'a [Record],
    operators: Vec<Operator>,
    config: QueryConfig,
}

impl<'a> Query<'a> {
    /// Creates a query with no operators
    pub fn new(records: &'a [Record]) -> Self {
        Self {
            records,
            operators: Vec::new(),
            config: QueryConfig::default(),
        }
    }

    /// Adds an operator
    pub fn with(mut self, operator: Operator) -> Self {
        self.operators.push(operator);
        self
    }

    /// Adds several operators
    pub fn with_all<I>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = Operator>,
    {
        self.operators.extend(operators);
        self
    }

    /// Sets the configuration
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Operators as supplied, before ordering
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Explains the execution order without running the query
    pub fn explain(&self) -> ExplainPlan {
        ExplainPlan::from_operators(&self.operators)
    }

    /// Runs the query and returns the result records
    pub fn run(self) -> Collection {
        self.run_with_stats().into_records()
    }

    /// Runs the query, recording row counts per stage
    pub fn run_with_stats(self) -> QueryOutcome {
        let input_rows = self.records.len().to_string();
        let operator_count = self.operators.len().to_string();
        let scope = ObservationScope::new(
            self.config.observe,
            &[("rows", input_rows.as_str()), ("operators", operator_count.as_str())],
        );

        let operators = ordered(self.operators);
        if self.config.observe {
            let order = operators
                .iter()
                .map(|op| op.kind().as_str())
                .collect::<Vec<_>>()
                .join(",");
            Logger::info(Event::QueryOrdered.as_str(), &[("order", order.as_str())]);
        }

        let mut records = copy_collection(self.records);
        let mut stages = Vec::with_capacity(operators.len());

        for op in &operators {
            let rows_in = records.len();
            records = op.apply(records);
            let rows_out = records.len();

            if self.config.log_stages {
                let rows_in = rows_in.to_string();
                let rows_out = rows_out.to_string();
                trace_event(
                    Event::QueryStage,
                    &[
                        ("kind", op.kind().as_str()),
                        ("description", op.description()),
                        ("rows_in", rows_in.as_str()),
                        ("rows_out", rows_out.as_str()),
                    ],
                );
            }

            stages.push(StageStats {
                kind: op.kind(),
                description: op.description().to_string(),
                rows_in,
                rows_out,
            });
        }

        let output_rows = records.len().to_string();
        scope.complete_with_fields(&[("rows", output_rows.as_str())]);

        QueryOutcome { records, stages }
    }
}
