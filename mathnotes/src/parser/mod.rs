//! Markup parser adapter
//!
//! Turns a cleaned line of recognized LaTeX into an [`Expr`] tree.
//! Preprocessing reconciles string-escaping differences between the
//! recognizer's output and the notation proper, and repairs the
//! recognizer's habit of reading `d/dx` as `d/d\times`.

use crate::ast::Expr;
use crate::error::{MathError, MathResult};
use crate::limits::ResourceLimits;
use pest::Parser;
use pest_derive::Parser;
use regex::Regex;
use std::sync::LazyLock;

pub mod expressions;

#[derive(Parser)]
#[grammar = "parser/latex.pest"]
pub struct LatexParser;

static TIMES_IN_FRAC_DERIVATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{d\}\{d\s*\\times\s*\}").unwrap());
static TIMES_IN_SLASH_DERIVATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d/d\s*\\times").unwrap());

/// Normalize raw markup before it reaches the grammar.
///
/// Literal `\\` collapses to `\`, and the recognizer's `d/d\times`
/// confusion is rewritten back to the `x`-variable derivative forms.
pub fn preprocess(text: &str) -> String {
    let unescaped = text.replace("\\\\", "\\");
    let repaired = TIMES_IN_FRAC_DERIVATIVE.replace_all(&unescaped, "{d}{dx}");
    TIMES_IN_SLASH_DERIVATIVE
        .replace_all(&repaired, "d/dx")
        .into_owned()
}

/// Parse one markup expression into a symbolic tree.
pub fn parse(text: &str, limits: &ResourceLimits) -> MathResult<Expr> {
    let cleaned = preprocess(text);
    if cleaned.trim().is_empty() {
        return Err(MathError::Parse("empty expression".to_string()));
    }
    if cleaned.len() > limits.max_input_bytes {
        return Err(MathError::Parse(format!(
            "expression of {} bytes exceeds the {} byte limit",
            cleaned.len(),
            limits.max_input_bytes
        )));
    }

    let mut pairs = LatexParser::parse(Rule::input, cleaned.trim())
        .map_err(|e| MathError::Parse(format!("{} in '{}'", e.variant.message(), text.trim())))?;

    let input = pairs
        .next()
        .ok_or_else(|| MathError::Parse("empty parse result".to_string()))?;

    let mut builder = expressions::AstBuilder::new(limits);
    for pair in input.into_inner() {
        if pair.as_rule() == Rule::expr {
            return builder.build_expr(pair);
        }
    }
    Err(MathError::Parse("no expression found".to_string()))
}
