//! Simplification executor, the default path

use crate::error::MathResult;
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::parser;
use crate::record::ResultRecord;
use crate::simplify::{expand, simplify};

pub fn run(latex: &str, limits: &ResourceLimits) -> MathResult<ResultRecord> {
    let tracker = TimeoutTracker::new();
    let expr = parser::parse(latex, limits)?;
    let original = expr.to_string();

    let mut simplified = simplify(&expr, limits, &tracker)?.to_string();
    if simplified == original {
        // Simplification made no visible progress; report the expanded
        // form instead.
        simplified = expand(&expr, limits, &tracker)?.to_string();
    }

    Ok(ResultRecord::Expression {
        latex: latex.to_string(),
        original,
        simplified,
    })
}
