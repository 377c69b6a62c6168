//! Equation solving over a single variable
//!
//! The solver works the equation into `f = 0`, expands, and reads off
//! polynomial coefficients: linear and quadratic equations get their
//! closed forms. Anything else falls back to operation-by-operation
//! isolation, which succeeds when the unknown occurs exactly once.

use crate::ast::{self, Equation, Expr, Func};
use crate::error::{MathError, MathResult};
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::simplify::{expand, simplify};
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;

/// All solutions of `equation` for `var`, rendered-deterministically
/// ordered. An empty vector means the equation has no solution.
pub fn solve(
    equation: &Equation,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Vec<Expr>> {
    let difference = ast::add(vec![equation.lhs.clone(), ast::neg(equation.rhs.clone())]);
    let expanded = expand(&difference, limits, tracker)?;

    if let Some(coeffs) = polynomial_coefficients(&expanded, var, limits, tracker)? {
        match coeffs.len() {
            0 | 1 => {
                let constant = coeffs.into_iter().next().unwrap_or_else(|| ast::num(0));
                return if constant.is_zero() {
                    Err(MathError::Unsupported(format!(
                        "equation holds for every value of {}",
                        var
                    )))
                } else {
                    Ok(Vec::new())
                };
            }
            2 => {
                let mut iter = coeffs.into_iter();
                let c0 = iter.next().unwrap_or_else(|| ast::num(0));
                let c1 = iter.next().unwrap_or_else(|| ast::num(0));
                // Expand so a symbolic constant term distributes out of
                // the leading minus.
                let solution = expand(&ast::div(ast::neg(c0), c1), limits, tracker)?;
                return Ok(vec![solution]);
            }
            3 => {
                let mut iter = coeffs.into_iter();
                let c = iter.next().unwrap_or_else(|| ast::num(0));
                let b = iter.next().unwrap_or_else(|| ast::num(0));
                let a = iter.next().unwrap_or_else(|| ast::num(0));
                return quadratic_roots(a, b, c, limits, tracker);
            }
            _ => {}
        }
    }

    let solution = isolate(&expanded, var, ast::num(0))?;
    Ok(vec![simplify(&solution, limits, tracker)?])
}

fn quadratic_roots(
    a: Expr,
    b: Expr,
    c: Expr,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Vec<Expr>> {
    let discriminant = simplify(
        &ast::add(vec![
            ast::pow(b.clone(), ast::num(2)),
            ast::neg(ast::mul(vec![ast::num(4), a.clone(), c])),
        ]),
        limits,
        tracker,
    )?;
    let root = Expr::Func(Func::Sqrt, Box::new(discriminant));
    let two_a = ast::mul(vec![ast::num(2), a]);
    let plus = simplify(
        &ast::div(
            ast::add(vec![ast::neg(b.clone()), root.clone()]),
            two_a.clone(),
        ),
        limits,
        tracker,
    )?;
    let minus = simplify(
        &ast::div(ast::add(vec![ast::neg(b), ast::neg(root)]), two_a),
        limits,
        tracker,
    )?;

    let mut solutions = vec![plus, minus];
    solutions.dedup_by(|x, y| x.to_string() == y.to_string());
    solutions.sort_by(compare_solutions);
    solutions.dedup_by(|x, y| x.to_string() == y.to_string());
    Ok(solutions)
}

fn compare_solutions(a: &Expr, b: &Expr) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Coefficients of `expr` as a polynomial in `var`, lowest degree
/// first, with trailing zero coefficients trimmed. `None` when the
/// expression is not polynomial in `var`.
pub(crate) fn polynomial_coefficients(
    expr: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Option<Vec<Expr>>> {
    let terms: Vec<&Expr> = match expr {
        Expr::Add(children) => children.iter().collect(),
        other => vec![other],
    };

    let mut by_degree: Vec<Vec<Expr>> = Vec::new();
    for term in terms {
        let Some((degree, coeff)) = term_degree_and_coefficient(term, var) else {
            return Ok(None);
        };
        if by_degree.len() <= degree {
            by_degree.resize(degree + 1, Vec::new());
        }
        by_degree[degree].push(coeff);
    }

    let mut coeffs: Vec<Expr> = Vec::new();
    for degree_terms in by_degree {
        coeffs.push(simplify(&ast::add(degree_terms), limits, tracker)?);
    }
    while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::is_zero) {
        coeffs.pop();
    }
    Ok(Some(coeffs))
}

/// Highest degree the coefficient table will be sized for. A literal
/// exponent above this is treated as non-polynomial and falls through
/// to isolation instead of driving a huge allocation.
const MAX_POLYNOMIAL_DEGREE: usize = 64;

/// Split one additive term into its degree in `var` and the remaining
/// coefficient factors. `None` when the term is not polynomial in `var`.
fn term_degree_and_coefficient(term: &Expr, var: &str) -> Option<(usize, Expr)> {
    let factors: Vec<&Expr> = match term {
        Expr::Mul(children) => children.iter().collect(),
        other => vec![other],
    };

    let mut degree: usize = 0;
    let mut coeff_factors: Vec<Expr> = Vec::new();
    for factor in factors {
        if !factor.contains_symbol(var) {
            coeff_factors.push((*factor).clone());
            continue;
        }
        match factor {
            Expr::Symbol(_) => degree += 1,
            Expr::Pow(base, exponent) => {
                let is_plain_var = matches!(base.as_ref(), Expr::Symbol(name) if name == var);
                let n = exponent.as_number()?;
                if !is_plain_var || !n.fract().is_zero() || n.is_sign_negative() {
                    return None;
                }
                degree += n.to_u32()? as usize;
            }
            _ => return None,
        }
    }
    if degree > MAX_POLYNOMIAL_DEGREE {
        return None;
    }
    Some((degree, ast::mul(coeff_factors)))
}

fn occurrences(expr: &Expr, var: &str) -> usize {
    match expr {
        Expr::Number(_) => 0,
        Expr::Symbol(name) => usize::from(name == var),
        Expr::Add(children) | Expr::Mul(children) => {
            children.iter().map(|c| occurrences(c, var)).sum()
        }
        Expr::Pow(base, exponent) => occurrences(base, var) + occurrences(exponent, var),
        Expr::Func(_, arg) => occurrences(arg, var),
        Expr::Integral {
            integrand, bounds, ..
        } => {
            occurrences(integrand, var)
                + bounds.as_ref().map_or(0, |(lower, upper)| {
                    occurrences(lower, var) + occurrences(upper, var)
                })
        }
        Expr::Derivative { inner, .. } => occurrences(inner, var),
    }
}

/// Rearrange `expr = target` step by step until `var` stands alone.
/// Requires the unknown to occur exactly once.
fn isolate(expr: &Expr, var: &str, target: Expr) -> MathResult<Expr> {
    if occurrences(expr, var) != 1 {
        return Err(MathError::Unsupported(format!(
            "could not solve for {}",
            var
        )));
    }
    match expr {
        Expr::Symbol(_) => Ok(target),
        Expr::Add(children) => {
            let (varying, others): (Vec<&Expr>, Vec<&Expr>) =
                children.iter().partition(|c| c.contains_symbol(var));
            let mut new_target = vec![target];
            new_target.extend(others.into_iter().cloned().map(ast::neg));
            isolate(varying[0], var, ast::add(new_target))
        }
        Expr::Mul(children) => {
            let (varying, others): (Vec<&Expr>, Vec<&Expr>) =
                children.iter().partition(|c| c.contains_symbol(var));
            let divisor = ast::mul(others.into_iter().cloned().collect());
            isolate(varying[0], var, ast::div(target, divisor))
        }
        Expr::Pow(base, exponent) => {
            if base.contains_symbol(var) {
                // u^c = t  =>  u = t^(1/c), principal branch
                let inverse = ast::div(ast::num(1), (**exponent).clone());
                isolate(base, var, ast::pow(target, inverse))
            } else {
                // c^u = t  =>  u = log(t)/log(c)
                let new_target = ast::div(
                    Expr::Func(Func::Log, Box::new(target)),
                    Expr::Func(Func::Log, Box::new((**base).clone())),
                );
                isolate(exponent, var, new_target)
            }
        }
        Expr::Func(func, arg) => {
            let new_target = match func {
                Func::Exp => Expr::Func(Func::Log, Box::new(target)),
                Func::Log => Expr::Func(Func::Exp, Box::new(target)),
                Func::Sqrt => ast::pow(target, ast::num(2)),
                Func::Sin | Func::Cos | Func::Tan => {
                    return Err(MathError::Unsupported(format!(
                        "cannot invert {} to solve for {}",
                        func.name(),
                        var
                    )))
                }
            };
            isolate(arg, var, new_target)
        }
        _ => Err(MathError::Unsupported(format!(
            "could not solve for {}",
            var
        ))),
    }
}
