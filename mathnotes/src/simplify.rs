//! Algebraic simplification and expansion
//!
//! Rewriting is a bottom-up pass repeated to a fixpoint under the
//! configured pass budget. All numeric folding is exact: a division or
//! reciprocal that does not terminate in the decimal representation is
//! left symbolic (`x**3/3` stays a power product, it never becomes
//! `0.333...`).

use crate::ast::{self, Expr, Func};
use crate::error::{MathError, MathResult};
use crate::limits::{ResourceLimits, TimeoutTracker};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Simplify to a fixpoint within the pass and time budget.
pub fn simplify(
    expr: &Expr,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Expr> {
    let mut current = expr.clone();
    for _ in 0..limits.max_simplify_passes {
        tracker.check(limits)?;
        let next = rewrite(&current)?;
        if next == current {
            return Ok(next);
        }
        current = next;
    }
    Ok(current)
}

/// Distribute products over sums and expand small integer powers of
/// sums, then simplify the result.
pub fn expand(expr: &Expr, limits: &ResourceLimits, tracker: &TimeoutTracker) -> MathResult<Expr> {
    tracker.check(limits)?;
    let distributed = expand_node(expr, limits, tracker)?;
    simplify(&distributed, limits, tracker)
}

/// Replace every occurrence of `var` with `replacement`.
pub fn substitute(expr: &Expr, var: &str, replacement: &Expr) -> Expr {
    match expr {
        Expr::Number(_) => expr.clone(),
        Expr::Symbol(name) => {
            if name == var {
                replacement.clone()
            } else {
                expr.clone()
            }
        }
        Expr::Add(children) => Expr::Add(
            children
                .iter()
                .map(|c| substitute(c, var, replacement))
                .collect(),
        ),
        Expr::Mul(children) => Expr::Mul(
            children
                .iter()
                .map(|c| substitute(c, var, replacement))
                .collect(),
        ),
        Expr::Pow(base, exponent) => ast::pow(
            substitute(base, var, replacement),
            substitute(exponent, var, replacement),
        ),
        Expr::Func(func, arg) => Expr::Func(*func, Box::new(substitute(arg, var, replacement))),
        Expr::Integral {
            integrand,
            var: int_var,
            bounds,
        } => Expr::Integral {
            // The integration variable shadows an outer substitution.
            integrand: if int_var.as_deref() == Some(var) {
                integrand.clone()
            } else {
                Box::new(substitute(integrand, var, replacement))
            },
            var: int_var.clone(),
            bounds: bounds.as_ref().map(|(lower, upper)| {
                (
                    Box::new(substitute(lower, var, replacement)),
                    Box::new(substitute(upper, var, replacement)),
                )
            }),
        },
        Expr::Derivative { inner, var: dv } => Expr::Derivative {
            inner: Box::new(substitute(inner, var, replacement)),
            var: dv.clone(),
        },
    }
}

/// One bottom-up rewrite pass.
pub(crate) fn rewrite(expr: &Expr) -> MathResult<Expr> {
    match expr {
        Expr::Number(_) | Expr::Symbol(_) => Ok(expr.clone()),
        Expr::Add(children) => {
            let children = children.iter().map(rewrite).collect::<MathResult<Vec<_>>>()?;
            rewrite_add(children)
        }
        Expr::Mul(children) => {
            let children = children.iter().map(rewrite).collect::<MathResult<Vec<_>>>()?;
            rewrite_mul(children)
        }
        Expr::Pow(base, exponent) => rewrite_pow(rewrite(base)?, rewrite(exponent)?),
        Expr::Func(func, arg) => Ok(rewrite_func(*func, rewrite(arg)?)),
        Expr::Integral {
            integrand,
            var,
            bounds,
        } => Ok(Expr::Integral {
            integrand: Box::new(rewrite(integrand)?),
            var: var.clone(),
            bounds: match bounds {
                Some((lower, upper)) => {
                    Some((Box::new(rewrite(lower)?), Box::new(rewrite(upper)?)))
                }
                None => None,
            },
        }),
        Expr::Derivative { inner, var } => Ok(Expr::Derivative {
            inner: Box::new(rewrite(inner)?),
            var: var.clone(),
        }),
    }
}

fn rewrite_add(children: Vec<Expr>) -> MathResult<Expr> {
    let mut flat: Vec<Expr> = Vec::new();
    for child in children {
        match child {
            Expr::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = Decimal::ZERO;
    // Like terms keyed by the rendering of their non-numeric part.
    let mut groups: Vec<(String, Expr, Decimal)> = Vec::new();
    for term in flat {
        if let Some(d) = term.as_number() {
            match constant.checked_add(d) {
                Some(sum) => constant = sum,
                None => groups.push((term.to_string(), term, Decimal::ONE)),
            }
            continue;
        }
        let (coeff, rest) = split_coefficient(&term);
        let key = rest.to_string();
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, _, acc)) => match acc.checked_add(coeff) {
                Some(sum) => *acc = sum,
                None => groups.push((key, rest, coeff)),
            },
            None => groups.push((key, rest, coeff)),
        }
    }

    let mut terms: Vec<Expr> = Vec::new();
    for (_, rest, coeff) in groups {
        if coeff.is_zero() {
            continue;
        }
        if coeff == Decimal::ONE {
            terms.push(rest);
        } else {
            terms.push(rewrite_mul(vec![Expr::Number(coeff), rest])?);
        }
    }
    if !constant.is_zero() || terms.is_empty() {
        terms.push(Expr::Number(constant));
    }
    terms.sort_by(compare_terms);
    Ok(ast::add(terms))
}

fn rewrite_mul(children: Vec<Expr>) -> MathResult<Expr> {
    let mut flat: Vec<Expr> = Vec::new();
    for child in children {
        match child {
            Expr::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    if flat.iter().any(Expr::is_zero) {
        return Ok(ast::num(0));
    }

    let mut coeff = Decimal::ONE;
    // Numeric reciprocals that do not fold exactly, kept for display.
    let mut residual: Vec<Expr> = Vec::new();
    // Symbolic factors grouped by base.
    let mut groups: Vec<(String, Expr, Vec<Expr>)> = Vec::new();

    for factor in flat {
        match factor {
            Expr::Number(d) => match coeff.checked_mul(d) {
                Some(product) => coeff = product,
                None => residual.push(Expr::Number(d)),
            },
            Expr::Pow(base, exponent) => {
                if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number()) {
                    match fold_numeric_power(coeff, b, e) {
                        Some(folded) => coeff = folded,
                        None => residual.push(ast::pow(Expr::Number(b), Expr::Number(e))),
                    }
                } else {
                    push_power(&mut groups, *base, *exponent);
                }
            }
            other => push_power(&mut groups, other, ast::num(1)),
        }
    }

    let mut factors: Vec<Expr> = Vec::new();
    for (_, base, exponents) in groups {
        let exponent = rewrite_add(exponents)?;
        if exponent.is_zero() {
            continue;
        }
        if exponent.is_one() {
            factors.push(base);
        } else {
            factors.push(rewrite_pow(base, exponent)?);
        }
    }
    factors.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
    factors.extend(residual);

    if factors.is_empty() {
        return Ok(Expr::Number(coeff));
    }
    let mut result: Vec<Expr> = Vec::new();
    if coeff != Decimal::ONE {
        result.push(Expr::Number(coeff));
    }
    result.extend(factors);
    Ok(ast::mul(result))
}

fn push_power(groups: &mut Vec<(String, Expr, Vec<Expr>)>, base: Expr, exponent: Expr) {
    let key = base.to_string();
    match groups.iter_mut().find(|(k, _, _)| *k == key) {
        Some((_, _, exponents)) => exponents.push(exponent),
        None => groups.push((key, base, vec![exponent])),
    }
}

fn rewrite_pow(base: Expr, exponent: Expr) -> MathResult<Expr> {
    if exponent.is_zero() {
        return Ok(ast::num(1));
    }
    if exponent.is_one() {
        return Ok(base);
    }
    if base.is_one() {
        return Ok(ast::num(1));
    }
    if base.is_zero() {
        if let Some(e) = exponent.as_number() {
            if e.is_sign_positive() {
                return Ok(ast::num(0));
            }
        }
    }
    // (b^m)^n folds when both exponents are numeric.
    if let Expr::Pow(inner_base, inner_exp) = &base {
        if let (Some(m), Some(n)) = (inner_exp.as_number(), exponent.as_number()) {
            if let Some(product) = m.checked_mul(n) {
                return rewrite_pow((**inner_base).clone(), Expr::Number(product));
            }
        }
    }
    if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number()) {
        if let Some(folded) = fold_numeric_power(Decimal::ONE, b, e) {
            return Ok(Expr::Number(folded));
        }
    }
    Ok(ast::pow(base, exponent))
}

fn rewrite_func(func: Func, arg: Expr) -> Expr {
    match (func, arg.as_number()) {
        (Func::Sin, Some(d)) | (Func::Tan, Some(d)) if d.is_zero() => ast::num(0),
        (Func::Cos, Some(d)) if d.is_zero() => ast::num(1),
        (Func::Exp, Some(d)) if d.is_zero() => ast::num(1),
        (Func::Log, Some(d)) if d == Decimal::ONE => ast::num(0),
        (Func::Sqrt, Some(d)) => match exact_sqrt(d) {
            Some(root) => Expr::Number(root),
            None => Expr::Func(func, Box::new(arg)),
        },
        _ => Expr::Func(func, Box::new(arg)),
    }
}

/// Multiply `acc` by `b^e`, only when the result is exact.
fn fold_numeric_power(acc: Decimal, base: Decimal, exponent: Decimal) -> Option<Decimal> {
    if !exponent.fract().is_zero() {
        return None;
    }
    let e = exponent.to_i64()?;
    if e.unsigned_abs() > 16 {
        return None;
    }
    let mut power = Decimal::ONE;
    for _ in 0..e.unsigned_abs() {
        power = power.checked_mul(base)?;
    }
    if e >= 0 {
        acc.checked_mul(power)
    } else {
        exact_div(acc, power)
    }
}

pub(crate) fn exact_div(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    let quotient = numerator.checked_div(denominator)?;
    if quotient.checked_mul(denominator)? == numerator {
        Some(quotient)
    } else {
        None
    }
}

fn exact_sqrt(d: Decimal) -> Option<Decimal> {
    if d.is_sign_negative() {
        return None;
    }
    let approx = d.to_f64()?.sqrt().round();
    if !approx.is_finite() {
        return None;
    }
    let candidate = Decimal::try_from(approx).ok()?;
    if candidate.checked_mul(candidate)? == d {
        Some(candidate)
    } else {
        None
    }
}

/// Split a term into its numeric coefficient and the remaining factors.
fn split_coefficient(term: &Expr) -> (Decimal, Expr) {
    match term {
        Expr::Number(d) => (*d, ast::num(1)),
        Expr::Mul(factors) => {
            let mut coeff = Decimal::ONE;
            let mut rest: Vec<Expr> = Vec::new();
            for factor in factors {
                match factor.as_number() {
                    Some(d) => match coeff.checked_mul(d) {
                        Some(product) => coeff = product,
                        None => rest.push(factor.clone()),
                    },
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, ast::mul(rest))
        }
        other => (Decimal::ONE, other.clone()),
    }
}

/// Polynomial-style term order: higher degree first, constants last.
fn compare_terms(a: &Expr, b: &Expr) -> Ordering {
    let a_num = a.as_number().is_some();
    let b_num = b.as_number().is_some();
    a_num
        .cmp(&b_num)
        .then_with(|| term_degree(b).cmp(&term_degree(a)))
        .then_with(|| {
            // Order by the symbolic part so `2*x*y` sorts with `x*y`.
            split_coefficient(a)
                .1
                .to_string()
                .cmp(&split_coefficient(b).1.to_string())
        })
}

fn term_degree(expr: &Expr) -> Decimal {
    match expr {
        Expr::Number(_) => Decimal::ZERO,
        Expr::Symbol(_) => Decimal::ONE,
        Expr::Pow(base, exponent) => match (base.as_ref(), exponent.as_number()) {
            (Expr::Symbol(_), Some(n)) => n,
            _ => Decimal::ONE,
        },
        Expr::Mul(factors) => factors.iter().map(term_degree).sum(),
        _ => Decimal::ONE,
    }
}

const MAX_EXPANDED_POWER: i64 = 8;

fn expand_node(expr: &Expr, limits: &ResourceLimits, tracker: &TimeoutTracker) -> MathResult<Expr> {
    tracker.check(limits)?;
    match expr {
        Expr::Number(_) | Expr::Symbol(_) => Ok(expr.clone()),
        Expr::Add(children) => {
            let children = children
                .iter()
                .map(|c| expand_node(c, limits, tracker))
                .collect::<MathResult<Vec<_>>>()?;
            Ok(ast::add(children))
        }
        Expr::Mul(children) => {
            let children = children
                .iter()
                .map(|c| expand_node(c, limits, tracker))
                .collect::<MathResult<Vec<_>>>()?;
            distribute(children, limits, tracker)
        }
        Expr::Pow(base, exponent) => {
            let base = expand_node(base, limits, tracker)?;
            let exponent = expand_node(exponent, limits, tracker)?;
            if let (Expr::Add(_), Some(e)) = (&base, exponent.as_number()) {
                if e.fract().is_zero() {
                    if let Some(n) = e.to_i64() {
                        if (2..=MAX_EXPANDED_POWER).contains(&n) {
                            let mut result = base.clone();
                            for _ in 1..n {
                                tracker.check(limits)?;
                                result = distribute(vec![result, base.clone()], limits, tracker)?;
                            }
                            return Ok(result);
                        }
                    }
                }
            }
            Ok(ast::pow(base, exponent))
        }
        Expr::Func(func, arg) => Ok(Expr::Func(
            *func,
            Box::new(expand_node(arg, limits, tracker)?),
        )),
        Expr::Integral { .. } | Expr::Derivative { .. } => Ok(expr.clone()),
    }
}

/// Most terms a single distribution is allowed to materialize. Inputs
/// past this bound fail with an error record instead of exhausting
/// memory.
const MAX_EXPANDED_TERMS: usize = 10_000;

/// Multiply out a product, distributing over any sum among the factors.
fn distribute(
    factors: Vec<Expr>,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Expr> {
    let mut terms: Vec<Vec<Expr>> = vec![Vec::new()];
    for factor in factors {
        tracker.check(limits)?;
        let choices: Vec<Expr> = match factor {
            Expr::Add(children) => children,
            other => vec![other],
        };
        if terms.len().saturating_mul(choices.len()) > MAX_EXPANDED_TERMS {
            return Err(MathError::Unsupported(format!(
                "expansion produces more than {} terms",
                MAX_EXPANDED_TERMS
            )));
        }
        let mut next: Vec<Vec<Expr>> = Vec::with_capacity(terms.len() * choices.len());
        for existing in &terms {
            for choice in &choices {
                let mut combined = existing.clone();
                combined.push(choice.clone());
                next.push(combined);
            }
        }
        terms = next;
    }
    if terms.len() == 1 {
        return Ok(ast::mul(terms.into_iter().next().unwrap_or_default()));
    }
    Ok(ast::add(terms.into_iter().map(ast::mul).collect()))
}

impl Expr {
    /// Does the expression simplify to exactly zero?
    pub fn simplifies_to_zero(
        &self,
        limits: &ResourceLimits,
        tracker: &TimeoutTracker,
    ) -> MathResult<bool> {
        Ok(simplify(self, limits, tracker)?.is_zero())
    }
}
