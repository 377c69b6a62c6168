//! Recognition adapter boundary
//!
//! The engine never looks at pixels. Whatever turns an image into
//! markup text lives behind this trait; the CLI ships a
//! subprocess-backed implementation, tests use stubs.

use crate::error::MathResult;
use std::path::Path;

/// Converts an image file into raw markup text, possibly multi-line.
///
/// A failure here is batch-fatal: no per-line records are produced.
pub trait Recognizer {
    fn recognize(&self, image: &Path) -> MathResult<String>;
}

/// Normalize recognizer output: drop math-mode delimiters and trim.
pub fn normalize_recognized(text: &str) -> String {
    text.replace('$', "").trim().to_string()
}
