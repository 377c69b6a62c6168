//! Wall-clock budget enforcement.
//!
//! A zero budget is already spent once any measurable time has passed,
//! which makes the timeout path testable without pathological input.

use mathnotes::simplify::simplify;
use mathnotes::{
    parse, MathError, Pipeline, ResourceLimits, ResultRecord, TimeoutTracker, VariableOutcome,
};
use std::thread;
use std::time::Duration;

fn zero_budget() -> ResourceLimits {
    ResourceLimits {
        max_evaluation_time_ms: 0,
        ..ResourceLimits::default()
    }
}

#[test]
fn tracker_fires_once_the_budget_is_spent() {
    let limits = zero_budget();
    let tracker = TimeoutTracker::new();
    thread::sleep(Duration::from_millis(5));
    let err = tracker.check(&limits).unwrap_err();
    assert!(matches!(err, MathError::Timeout { limit_ms: 0, .. }));
}

#[test]
fn simplification_propagates_an_exhausted_budget() {
    let limits = zero_budget();
    let tracker = TimeoutTracker::new();
    thread::sleep(Duration::from_millis(5));
    let expr = parse("x + 1", &ResourceLimits::default()).unwrap();
    let err = simplify(&expr, &limits, &tracker).unwrap_err();
    assert!(err.to_string().contains("exceeded 0ms"));
}

#[test]
fn spent_budget_surfaces_as_a_failed_variable_outcome() {
    // Parsing a line this long consumes measurable wall time, so the
    // zero budget is exhausted before the solver's first check.
    let pipeline = Pipeline::with_limits(zero_budget());
    let line = format!("{} = 0", vec!["x"; 8000].join(" + "));
    match pipeline.process_expression(&line) {
        ResultRecord::Equation { solutions, .. } => match &solutions["x"] {
            VariableOutcome::Failed { error } => {
                assert!(error.starts_with("Could not solve for x:"));
                assert!(error.contains("exceeded 0ms"));
            }
            other => panic!("expected a failed outcome, got {:?}", other),
        },
        other => panic!("expected an equation record, got {:?}", other),
    }
}
