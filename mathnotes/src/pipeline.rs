//! Expression pipeline
//!
//! Splits a recognized batch into lines, routes each line through the
//! classifier to its executor, and aggregates the records in input
//! order. The pipeline owns nothing but configuration, so concurrent
//! invocations need no coordination.

use crate::classifier::{classify, OperationKind};
use crate::error::MathResult;
use crate::executor;
use crate::limits::ResourceLimits;
use crate::recognize::Recognizer;
use crate::record::ResultRecord;
use std::path::Path;
use tracing::{debug, info};

pub struct Pipeline {
    limits: ResourceLimits,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Classify and execute a single markup expression.
    pub fn process_expression(&self, latex: &str) -> ResultRecord {
        let kind = classify(latex);
        debug!(latex, ?kind, "classified expression");
        executor::execute(kind, latex, &self.limits)
    }

    /// Process a whole recognized batch: one record per non-blank line,
    /// in input order. Blank lines contribute nothing; a line that
    /// fails becomes an `error` record without stopping the batch.
    pub fn process_batch(&self, raw_text: &str) -> Vec<ResultRecord> {
        raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.process_expression(line))
            .collect()
    }

    /// Run the recognition adapter, then process its output.
    /// Recognition failure is batch-fatal and propagates.
    pub fn process_image(
        &self,
        recognizer: &dyn Recognizer,
        image: &Path,
    ) -> MathResult<Vec<ResultRecord>> {
        let text = recognizer.recognize(image)?;
        info!(lines = text.lines().count(), "recognized markup from image");
        Ok(self.process_batch(&text))
    }

    /// Expose the classifier verdict without executing, for callers
    /// that only want routing information.
    pub fn classify(&self, latex: &str) -> OperationKind {
        classify(latex)
    }
}
