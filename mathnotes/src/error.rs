//! Error types for the mathnotes engine
//!
//! The three-tier policy (per-variable, per-expression, batch-fatal)
//! lives in the executors and the pipeline; this module only provides
//! the error value they catch and render.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MathError {
    /// The markup was not syntactically valid in the supported notation.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A capability the backend does not cover for this input
    /// (e.g. a non-elementary antiderivative).
    #[error("{0}")]
    Unsupported(String),

    /// An executor exceeded its evaluation budget.
    #[error("evaluation exceeded {limit_ms}ms (took {elapsed_ms}ms)")]
    Timeout { limit_ms: u64, elapsed_ms: u64 },

    /// The recognition adapter failed; fatal for the whole batch.
    #[error("Recognition error: {0}")]
    Recognize(String),

    /// Anything else that escapes an executor.
    #[error("{0}")]
    Engine(String),
}

pub type MathResult<T> = Result<T, MathError>;
