//! # mathnotes engine
//!
//! Takes the markup text a handwriting recognizer produced for a page
//! of math and decides per line what the writer wanted: solve an
//! equation, evaluate an integral, take a derivative, or just tidy an
//! expression. It executes that against the symbolic backend and
//! returns one structured record per line.
//!
//! ## Quick start
//!
//! ```rust
//! use mathnotes::Pipeline;
//!
//! let pipeline = Pipeline::new();
//! let records = pipeline.process_batch("x + 1 = 2\n2x \\cdot 3");
//! assert_eq!(records.len(), 2);
//! ```
//!
//! ## Shape
//!
//! - [`classifier`] routes raw markup by substring markers, first
//!   match wins (integral beats equality sign).
//! - [`parser`] turns a cleaned line into an [`ast::Expr`] tree.
//! - [`executor`] holds the four operation executors; each catches its
//!   own failures so one bad line never sinks the batch.
//! - [`pipeline`] splits multi-line input and aggregates records.
//! - [`solve`], [`calculus`], and [`simplify`] are the symbolic
//!   capabilities the executors consume.

pub mod ast;
pub mod calculus;
pub mod classifier;
pub mod error;
pub mod executor;
pub mod limits;
pub mod parser;
pub mod pipeline;
pub mod recognize;
pub mod record;
pub mod simplify;
pub mod solve;

pub use ast::{Equation, Expr, Func};
pub use classifier::{classify, OperationKind};
pub use error::{MathError, MathResult};
pub use limits::{ResourceLimits, TimeoutTracker};
pub use parser::parse;
pub use pipeline::Pipeline;
pub use recognize::{normalize_recognized, Recognizer};
pub use record::{ResultRecord, VariableOutcome};

#[cfg(test)]
mod tests;
