//! Explain output for a query
//!
//! Shows the canonical execution order without running anything.
//! Output is deterministic for a given operator list.

use std::fmt;

use serde::Serialize;

use super::evaluator::ordered;
use super::kind::OperatorKind;
use super::operator::Operator;

/// One line of an explain plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainStep {
    /// Position in execution order, starting at 1
    pub position: usize,
    /// Fixed rank of the operator kind
    pub rank: usize,
    /// Operator kind
    pub kind: OperatorKind,
    /// Operator configuration
    pub description: String,
}

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainPlan {
    /// Steps in execution order
    pub steps: Vec<ExplainStep>,
    /// True if execution order differs from the order supplied
    pub reordered: bool,
}

impl ExplainPlan {
    /// Builds an explain plan for operators in caller order
    pub fn from_operators(operators: &[Operator]) -> Self {
        let supplied: Vec<(OperatorKind, &str)> = operators
            .iter()
            .map(|op| (op.kind(), op.description()))
            .collect();

        let steps: Vec<ExplainStep> = ordered(operators.iter().cloned())
            .iter()
            .enumerate()
            .map(|(i, op)| ExplainStep {
                position: i + 1,
                rank: op.rank(),
                kind: op.kind(),
                description: op.description().to_string(),
            })
            .collect();

        let reordered = steps
            .iter()
            .zip(&supplied)
            .any(|(step, (kind, description))| {
                step.kind != *kind || step.description != *description
            });

        Self { steps, reordered }
    }

    /// Kinds in execution order
    pub fn kinds(&self) -> Vec<OperatorKind> {
        self.steps.iter().map(|step| step.kind).collect()
    }

    /// Serializes the plan as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN QUERY ===")?;

        if self.steps.is_empty() {
            writeln!(f, "No operators: input is returned as a copy")?;
            return Ok(());
        }

        writeln!(
            f,
            "Order: {}",
            if self.reordered { "REORDERED" } else { "AS SUPPLIED" }
        )?;
        for step in &self.steps {
            writeln!(
                f,
                "  {}. [{}] {}({})",
                step.position, step.rank, step.kind, step.description
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::operator::{filter_in, limit, or, select, sort_by};
    use crate::query::sorter::SortOrder;

    #[test]
    fn test_explain_orders_steps() {
        let plan = ExplainPlan::from_operators(&[
            select(["name"]),
            limit(5),
            filter_in("city", ["Oslo"]),
        ]);

        assert!(plan.reordered);
        assert_eq!(
            plan.kinds(),
            vec![OperatorKind::FilterIn, OperatorKind::Limit, OperatorKind::Select]
        );
        assert_eq!(plan.steps[0].position, 1);
        assert_eq!(plan.steps[0].rank, 2);
    }

    #[test]
    fn test_explain_not_reordered() {
        let plan = ExplainPlan::from_operators(&[sort_by("age", SortOrder::Asc), limit(1)]);

        assert!(!plan.reordered);

        let output = plan.to_string();
        assert!(output.contains("AS SUPPLIED"));
        assert!(output.contains("1. [3] sortBy(age asc)"));
        assert!(output.contains("2. [4] limit(1)"));
    }

    #[test]
    fn test_explain_empty() {
        let plan = ExplainPlan::from_operators(&[]);
        assert!(plan.steps.is_empty());
        assert!(plan.to_string().contains("No operators"));
    }

    #[test]
    fn test_explain_combinator_description() {
        let plan =
            ExplainPlan::from_operators(&[or([filter_in("a", [1]), filter_in("b", [2])])]);

        assert_eq!(
            plan.steps[0].description,
            "filterIn(a in [1]) | filterIn(b in [2])"
        );
    }

    #[test]
    fn test_explain_deterministic() {
        let ops = vec![limit(2), filter_in("x", ["y"])];
        let first = ExplainPlan::from_operators(&ops);
        let second = ExplainPlan::from_operators(&ops);

        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.to_json(), second.to_json());
        assert_eq!(first.to_json()["steps"][0]["kind"], "filterIn");
    }
}
