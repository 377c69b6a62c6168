//! Result records
//!
//! The wire shape of one processed expression. Tags and field names
//! are a stable contract with the notes frontend; changing them breaks
//! rendering on the canvas.

use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome for a single variable inside a successful record.
///
/// A failed solve/integrate/differentiate for one variable never fails
/// the record; it is recorded here so siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VariableOutcome {
    /// Solution list from the equation solver.
    Solutions(Vec<String>),
    /// Rendered value from integration or differentiation.
    Value(String),
    /// Human-readable per-variable failure.
    Failed { error: String },
}

/// One processed markup expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultRecord {
    Equation {
        latex: String,
        expression: String,
        variables: Vec<String>,
        solutions: BTreeMap<String, VariableOutcome>,
    },
    EquationWithoutVariables {
        latex: String,
        expression: String,
        result: String,
    },
    Integration {
        latex: String,
        expression: String,
        variables: Vec<String>,
        results: BTreeMap<String, VariableOutcome>,
    },
    IntegrationError {
        latex: String,
        message: String,
    },
    Differentiation {
        latex: String,
        expression: String,
        variables: Vec<String>,
        results: BTreeMap<String, VariableOutcome>,
    },
    DifferentiationError {
        latex: String,
        message: String,
    },
    Expression {
        latex: String,
        original: String,
        simplified: String,
    },
    Error {
        latex: String,
        message: String,
    },
}

impl ResultRecord {
    /// The original markup this record was produced from.
    pub fn latex(&self) -> &str {
        match self {
            ResultRecord::Equation { latex, .. }
            | ResultRecord::EquationWithoutVariables { latex, .. }
            | ResultRecord::Integration { latex, .. }
            | ResultRecord::IntegrationError { latex, .. }
            | ResultRecord::Differentiation { latex, .. }
            | ResultRecord::DifferentiationError { latex, .. }
            | ResultRecord::Expression { latex, .. }
            | ResultRecord::Error { latex, .. } => latex,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultRecord::Error { .. })
    }
}
