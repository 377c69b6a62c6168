//! Integration executor
//!
//! The markup is expected to already encode the integral operator, so
//! this executor parses the whole line and force-evaluates the
//! deferred construct. The per-variable loop records the same
//! evaluation under every free variable: the evaluation does not
//! depend on the loop variable. The repetition is part of the response
//! shape clients rely on (see DESIGN.md).

use crate::calculus::doit;
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
        return Ok(ResultRecord::IntegrationError {
            latex: latex.to_string(),
            message: "No variables found for integration".to_string(),
        });
    }

    let mut results: BTreeMap<String, VariableOutcome> = BTreeMap::new();
    for var in &variables {
        let outcome = match doit(&expr, limits, &tracker) {
            Ok(value) => VariableOutcome::Value(value.to_string()),
            Err(e) => VariableOutcome::Failed {
                error: format!("Could not integrate with respect to {}: {}", var, e),
            },
        };
        results.insert(var.clone(), outcome);
    }

    Ok(ResultRecord::Integration {
        latex: latex.to_string(),
        expression: expr.to_string(),
        variables: variables.into_iter().collect(),
        results,
    })
}
