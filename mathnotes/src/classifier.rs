//! Operation classification
//!
//! A pure substring inspection of the raw markup, before any parsing.
//! The dispatch table is ordered and the first matching predicate
//! wins: an equation written inside an integral is an integration, not
//! an equation. That precedence is a policy choice, so it lives in one
//! auditable table instead of nested conditionals.

use serde::Serialize;

/// Which executor a markup expression is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Equation,
    Integration,
    Differentiation,
    Expression,
}

const DERIVATIVE_MARKERS: [&str; 4] = [
    "\\frac{d}{d",
    "\\frac{\\partial}{\\partial",
    "d/d",
    "∂/∂",
];

fn has_integral_marker(text: &str) -> bool {
    text.contains("\\int")
}

fn has_derivative_marker(text: &str) -> bool {
    DERIVATIVE_MARKERS.iter().any(|marker| text.contains(marker))
}

fn has_equality_sign(text: &str) -> bool {
    text.contains('=')
}

/// Ordered dispatch table; evaluated top to bottom.
const DISPATCH: [(fn(&str) -> bool, OperationKind); 3] = [
    (has_integral_marker, OperationKind::Integration),
    (has_derivative_marker, OperationKind::Differentiation),
    (has_equality_sign, OperationKind::Equation),
];

/// Classify one markup expression. Total: any string maps to exactly
/// one kind, and unmatched input defaults to plain simplification.
pub fn classify(text: &str) -> OperationKind {
    DISPATCH
        .iter()
        .find(|(predicate, _)| predicate(text))
        .map(|(_, kind)| *kind)
        .unwrap_or(OperationKind::Expression)
}
