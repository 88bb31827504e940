//! Query pipeline over in-memory records
//!
//! A query takes a base collection and an unordered set of operators,
//! puts the operators into a fixed execution order and folds the
//! collection through them.
//!
//! # Execution order
//!
//! `and` → `or` → `filterIn` → `sortBy` → `limit` → `format` → `select`
//!
//! Operators of the same kind run in the order they were supplied.
//!
//! # Invariants
//!
//! - The caller's collection is never modified
//! - Evaluation is deterministic: same records + same operators = same result
//! - Evaluation never fails; only building operators from loose input can

mod config;
mod description;
mod errors;
mod evaluator;
mod explain;
mod kind;
mod operator;
mod record;
mod sorter;

pub use config::QueryConfig;
pub use description::{FormatterRegistry, OperatorDescription, QueryDescription};
pub use errors::{QueryError, QueryResult};
pub use evaluator::{ordered, query, Query, QueryOutcome, StageStats};
pub use explain::{ExplainPlan, ExplainStep};
pub use kind::{OperatorKind, PRIORITY};
pub use operator::{
    and, filter_in, format, format_with, limit, or, select, sort_by, Operator, Transform,
};
pub use record::{
    collection_from_value, copy_collection, copy_record, record_from_value, Collection, Record,
};
pub use sorter::{compare_values, records_equal, sort_records, values_equal, SortOrder};
