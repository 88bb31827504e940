//! Operator kinds and the fixed execution ranking
//!
//! The execution order of a query depends only on the kinds of its operators,
//! never on the order the caller supplied them in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a query operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatorKind {
    /// Intersection of filtering operators
    And,
    /// Union of filtering operators
    Or,
    /// Membership filter
    FilterIn,
    /// Sort by field
    SortBy,
    /// Truncate to N records
    Limit,
    /// Rewrite a field's value
    Format,
    /// Project to a set of fields
    Select,
}

/// Canonical execution order. Lowest index runs first.
pub static PRIORITY: [OperatorKind; 7] = [
    OperatorKind::And,
    OperatorKind::Or,
    OperatorKind::FilterIn,
    OperatorKind::SortBy,
    OperatorKind::Limit,
    OperatorKind::Format,
    OperatorKind::Select,
];

impl OperatorKind {
    /// Returns this kind's position in the execution order
    pub fn rank(&self) -> usize {
        PRIORITY
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(PRIORITY.len())
    }

    /// Returns the operator name as callers write it
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
            OperatorKind::FilterIn => "filterIn",
            OperatorKind::SortBy => "sortBy",
            OperatorKind::Limit => "limit",
            OperatorKind::Format => "format",
            OperatorKind::Select => "select",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
