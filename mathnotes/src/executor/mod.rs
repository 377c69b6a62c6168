//! Operation executors
//!
//! One executor per [`OperationKind`]. Each parses its markup, invokes
//! the symbolic backend, and shapes a [`ResultRecord`]. Failures follow
//! the three-tier policy: a per-variable failure becomes a `Failed`
//! outcome inside a successful record, anything that escapes the
//! executor degrades the whole expression to an `error` record.

use crate::classifier::OperationKind;
use crate::error::MathResult;
use crate::limits::ResourceLimits;
use crate::record::ResultRecord;
use tracing::warn;

pub mod differentiation;
pub mod equation;
pub mod expression;
pub mod integration;

/// Route one classified expression to its executor.
pub fn execute(kind: OperationKind, latex: &str, limits: &ResourceLimits) -> ResultRecord {
    let result = match kind {
        OperationKind::Equation => equation::run(latex, limits),
        OperationKind::Integration => integration::run(latex, limits),
        OperationKind::Differentiation => differentiation::run(latex, limits),
        OperationKind::Expression => expression::run(latex, limits),
    };
    degrade(latex, result)
}

/// Per-expression failure boundary: the batch never stops on one bad line.
fn degrade(latex: &str, result: MathResult<ResultRecord>) -> ResultRecord {
    match result {
        Ok(record) => record,
        Err(e) => {
            warn!(latex, error = %e, "expression degraded to error record");
            ResultRecord::Error {
                latex: latex.to_string(),
                message: e.to_string(),
            }
        }
    }
}
