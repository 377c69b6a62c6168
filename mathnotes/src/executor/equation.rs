//! Equation solving executor

use crate::ast::{self, Equation};
use crate::error::MathResult;
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::parser;
use crate::record::{ResultRecord, VariableOutcome};
use crate::solve::solve;
use std::collections::BTreeMap;

pub fn run(latex: &str, limits: &ResourceLimits) -> MathResult<ResultRecord> {
    let tracker = TimeoutTracker::new();

    // Split on the first equality sign; any further `=` belongs to the
    // right-hand side.
    let (lhs_text, rhs_text) = latex.split_once('=').unwrap_or((latex, "0"));
    let lhs = parser::parse(lhs_text, limits)?;
    let rhs = parser::parse(rhs_text, limits)?;
    let equation = Equation::new(lhs.clone(), rhs.clone());
    let variables = equation.free_symbols();

    if variables.is_empty() {
        let difference = ast::add(vec![lhs, ast::neg(rhs)]);
        let holds = difference.simplifies_to_zero(limits, &tracker)?;
        return Ok(ResultRecord::EquationWithoutVariables {
            latex: latex.to_string(),
            expression: equation.to_string(),
            result: if holds { "True" } else { "False" }.to_string(),
        });
    }

    let mut solutions: BTreeMap<String, VariableOutcome> = BTreeMap::new();
    for var in &variables {
        let outcome = match solve(&equation, var, limits, &tracker) {
            Ok(found) => {
                VariableOutcome::Solutions(found.iter().map(ToString::to_string).collect())
            }
            Err(e) => VariableOutcome::Failed {
                error: format!("Could not solve for {}: {}", var, e),
            },
        };
        solutions.insert(var.clone(), outcome);
    }

    Ok(ResultRecord::Equation {
        latex: latex.to_string(),
        expression: equation.to_string(),
        variables: variables.into_iter().collect(),
        solutions,
    })
}
