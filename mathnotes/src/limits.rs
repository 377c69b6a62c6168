//! Resource limits and timeout tracking
//!
//! Symbolic rewriting can diverge on pathological input, so every
//! executor invocation carries a wall-clock budget and the simplifier
//! fixpoint carries a pass budget. Limits are configuration, not
//! shared state: each pipeline owns its copy.

use crate::error::{MathError, MathResult};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum size of one markup expression, in bytes.
    pub max_input_bytes: usize,

    /// Maximum nesting depth the parser will build.
    pub max_expression_depth: usize,

    /// Maximum rewrite passes before the simplifier gives up and
    /// returns its best effort.
    pub max_simplify_passes: usize,

    /// Wall-clock budget for a single executor invocation.
    pub max_evaluation_time_ms: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 64 * 1024,
            max_expression_depth: 64,
            max_simplify_passes: 32,
            max_evaluation_time_ms: 1000,
        }
    }
}

impl ResourceLimits {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tracks elapsed time for one executor invocation.
pub struct TimeoutTracker {
    start_time: Instant,
}

impl TimeoutTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Errors once the invocation has exceeded its wall-clock budget.
    pub fn check(&self, limits: &ResourceLimits) -> MathResult<()> {
        let elapsed_ms = self.start_time.elapsed().as_millis() as u64;
        if elapsed_ms > limits.max_evaluation_time_ms {
            return Err(MathError::Timeout {
                limit_ms: limits.max_evaluation_time_ms,
                elapsed_ms,
            });
        }
        Ok(())
    }
}

impl Default for TimeoutTracker {
    fn default() -> Self {
        Self::new()
    }
}
