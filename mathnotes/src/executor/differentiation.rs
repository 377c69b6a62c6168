//! Differentiation executor

use crate::ast::Expr;
use crate::calculus::{differentiate, doit};
use crate::error::MathResult;
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::parser;
use crate::record::{ResultRecord, VariableOutcome};
use std::collections::BTreeMap;

pub fn run(latex: &str, limits: &ResourceLimits) -> MathResult<ResultRecord> {
    let tracker = TimeoutTracker::new();
    let expr = parser::parse(latex, limits)?;
    let variables = expr.free_symbols();

    if variables.is_empty() {
        return Ok(ResultRecord::DifferentiationError {
            latex: latex.to_string(),
            message: "No variables found for differentiation".to_string(),
        });
    }

    let mut results: BTreeMap<String, VariableOutcome> = BTreeMap::new();
    if let Expr::Derivative { var, .. } = &expr {
        // The parser produced a deferred derivative: evaluate it with
        // respect to its bound variable only. Exact, not approximate.
        let outcome = match doit(&expr, limits, &tracker) {
            Ok(value) => VariableOutcome::Value(value.to_string()),
            Err(e) => VariableOutcome::Failed {
                error: format!("Could not differentiate with respect to {}: {}", var, e),
            },
        };
        results.insert(var.clone(), outcome);
    } else {
        // Derivative notation that parsed to a plain expression:
        // differentiate independently for every free variable.
        for var in &variables {
            let outcome = match differentiate(&expr, var, limits, &tracker) {
                Ok(value) => VariableOutcome::Value(value.to_string()),
                Err(e) => VariableOutcome::Failed {
                    error: format!("Could not differentiate with respect to {}: {}", var, e),
                },
            };
            results.insert(var.clone(), outcome);
        }
    }

    Ok(ResultRecord::Differentiation {
        latex: latex.to_string(),
        expression: expr.to_string(),
        variables: variables.into_iter().collect(),
        results,
    })
}
