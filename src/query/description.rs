//! Declarative query descriptions
//!
//! A JSON form of an operator list, for embedders that keep queries in
//! configuration rather than code:
//!
//! ```json
//! {"operators": [
//!     {"op": "filterIn", "field": "country", "values": ["FR", "DE"]},
//!     {"op": "sortBy", "field": "age", "order": "desc"},
//!     {"op": "format", "field": "name", "formatter": "upper"},
//!     {"op": "limit", "count": 10}
//! ]}
//! ```
//!
//! `format` names its transform; names resolve through a
//! [`FormatterRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{log_event, Event};

use super::config::QueryConfig;
use super::errors::{QueryError, QueryResult};
use super::operator::{self, Operator, Transform};
use super::sorter::SortOrder;

/// One operator in a query description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OperatorDescription {
    Select {
        fields: Vec<String>,
    },
    FilterIn {
        field: String,
        values: Vec<Value>,
    },
    SortBy {
        field: String,
        order: String,
    },
    Limit {
        count: usize,
    },
    Format {
        field: String,
        formatter: String,
    },
    Or {
        operators: Vec<OperatorDescription>,
    },
    And {
        operators: Vec<OperatorDescription>,
    },
}

impl OperatorDescription {
    /// Builds the operator, resolving formatter names through `registry`
    pub fn build(&self, registry: &FormatterRegistry) -> QueryResult<Operator> {
        let op = match self {
            OperatorDescription::Select { fields } => operator::select(fields.iter().cloned()),
            OperatorDescription::FilterIn { field, values } => {
                operator::filter_in(field.clone(), values.iter().cloned())
            }
            OperatorDescription::SortBy { field, order } => {
                operator::sort_by(field.clone(), order.parse::<SortOrder>()?)
            }
            OperatorDescription::Limit { count } => operator::limit(*count),
            OperatorDescription::Format { field, formatter } => {
                operator::format_with(field.clone(), registry.resolve(formatter)?)
            }
            OperatorDescription::Or { operators } => operator::or(build_all(operators, registry)?),
            OperatorDescription::And { operators } => {
                operator::and(build_all(operators, registry)?)
            }
        };
        Ok(op)
    }
}

fn build_all(
    descriptions: &[OperatorDescription],
    registry: &FormatterRegistry,
) -> QueryResult<Vec<Operator>> {
    descriptions.iter().map(|d| d.build(registry)).collect()
}

/// A full query description: an unordered list of operators
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryDescription {
    #[serde(default)]
    pub operators: Vec<OperatorDescription>,
}

impl QueryDescription {
    /// Parses a description from JSON text
    pub fn from_json(text: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a description from a JSON value
    pub fn from_value(value: Value) -> QueryResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Builds every operator, in description order
    pub fn build(&self, registry: &FormatterRegistry) -> QueryResult<Vec<Operator>> {
        build_all(&self.operators, registry)
    }

    /// Parses and builds in one step, logging the outcome when observed
    pub fn load(
        text: &str,
        registry: &FormatterRegistry,
        config: &QueryConfig,
    ) -> QueryResult<Vec<Operator>> {
        let result = Self::from_json(text).and_then(|d| d.build(registry));

        if config.observe {
            match &result {
                Ok(ops) => {
                    let count = ops.len().to_string();
                    log_event(Event::DescriptionLoaded, &[("operators", count.as_str())]);
                }
                Err(err) => {
                    let reason = err.to_string();
                    log_event(
                        Event::DescriptionRejected,
                        &[("code", err.code()), ("reason", reason.as_str())],
                    );
                }
            }
        }

        result
    }
}

/// Named value transforms for `format` descriptions
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Transform>,
}

impl FormatterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the string transforms `upper`, `lower`,
    /// `trim` and `string`.
    ///
    /// The first three leave non-string values untouched; `string` renders
    /// any value as text.
    pub fn with_builtins() -> Self {
        Self::new()
            .with("upper", |v| map_str(v, str::to_uppercase))
            .with("lower", |v| map_str(v, str::to_lowercase))
            .with("trim", |v| map_str(v, |s| s.trim().to_string()))
            .with("string", |v| match v {
                Value::String(_) => v.clone(),
                other => Value::String(other.to_string()),
            })
    }

    /// Registers a transform, replacing any previous one with that name
    pub fn with<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.register(name, transform);
        self
    }

    /// Registers a transform in place
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(transform));
    }

    /// Looks up a transform by name
    pub fn resolve(&self, name: &str) -> QueryResult<Transform> {
        self.formatters
            .get(name)
            .cloned()
            .ok_or_else(|| QueryError::UnknownFormatter(name.to_string()))
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.formatters.keys().collect();
        names.sort();
        f.debug_struct("FormatterRegistry")
            .field("formatters", &names)
            .finish()
    }
}

fn map_str(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}
