//! Differentiation, integration, and forced evaluation of deferred
//! constructs
//!
//! Derivatives are exact rewrites; integration covers the elementary
//! antiderivatives the recognizer's input realistically contains
//! (polynomials, linear-substitution forms, elementary functions) and
//! reports anything else as unsupported rather than guessing.

use crate::ast::{self, Expr, Func};
use crate::error::{MathError, MathResult};
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::simplify::{simplify, substitute};
use crate::solve::polynomial_coefficients;
use rust_decimal::Decimal;

/// Force-evaluate every deferred integral and derivative in the tree,
/// then simplify.
pub fn doit(expr: &Expr, limits: &ResourceLimits, tracker: &TimeoutTracker) -> MathResult<Expr> {
    tracker.check(limits)?;
    let resolved = resolve(expr, limits, tracker)?;
    simplify(&resolved, limits, tracker)
}

/// Derivative of `expr` with respect to `var`, with deferred constructs
/// resolved first.
pub fn differentiate(
    expr: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Expr> {
    let resolved = doit(expr, limits, tracker)?;
    let derivative = diff_node(&resolved, var)?;
    simplify(&derivative, limits, tracker)
}

/// Antiderivative of `expr` with respect to `var`.
pub fn integrate(
    expr: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Expr> {
    let resolved = doit(expr, limits, tracker)?;
    let anti = antiderivative(&resolved, var, limits, tracker)?;
    simplify(&anti, limits, tracker)
}

fn resolve(expr: &Expr, limits: &ResourceLimits, tracker: &TimeoutTracker) -> MathResult<Expr> {
    match expr {
        Expr::Number(_) | Expr::Symbol(_) => Ok(expr.clone()),
        Expr::Add(children) => Ok(ast::add(
            children
                .iter()
                .map(|c| resolve(c, limits, tracker))
                .collect::<MathResult<Vec<_>>>()?,
        )),
        Expr::Mul(children) => Ok(ast::mul(
            children
                .iter()
                .map(|c| resolve(c, limits, tracker))
                .collect::<MathResult<Vec<_>>>()?,
        )),
        Expr::Pow(base, exponent) => Ok(ast::pow(
            resolve(base, limits, tracker)?,
            resolve(exponent, limits, tracker)?,
        )),
        Expr::Func(func, arg) => Ok(Expr::Func(
            *func,
            Box::new(resolve(arg, limits, tracker)?),
        )),
        Expr::Integral {
            integrand,
            var,
            bounds,
        } => {
            let inner = resolve(integrand, limits, tracker)?;
            let var = match var {
                Some(v) => v.clone(),
                // Differential omitted in the markup: integrate with
                // respect to the sole free variable.
                None => {
                    let symbols = inner.free_symbols();
                    if symbols.len() == 1 {
                        symbols.into_iter().next().unwrap_or_default()
                    } else {
                        return Err(MathError::Unsupported(format!(
                            "cannot determine the integration variable of {}",
                            expr
                        )));
                    }
                }
            };
            let anti = antiderivative(&inner, &var, limits, tracker)?;
            match bounds {
                None => Ok(anti),
                Some((lower, upper)) => {
                    let lower = resolve(lower, limits, tracker)?;
                    let upper = resolve(upper, limits, tracker)?;
                    let at_upper = substitute(&anti, &var, &upper);
                    let at_lower = substitute(&anti, &var, &lower);
                    Ok(ast::add(vec![at_upper, ast::neg(at_lower)]))
                }
            }
        }
        Expr::Derivative { inner, var } => {
            let inner = resolve(inner, limits, tracker)?;
            let inner = simplify(&inner, limits, tracker)?;
            diff_node(&inner, var)
        }
    }
}

/// Structural derivative. Expects deferred constructs to be resolved.
fn diff_node(expr: &Expr, var: &str) -> MathResult<Expr> {
    match expr {
        Expr::Number(_) => Ok(ast::num(0)),
        Expr::Symbol(name) => Ok(if name == var { ast::num(1) } else { ast::num(0) }),
        Expr::Add(children) => Ok(ast::add(
            children
                .iter()
                .map(|c| diff_node(c, var))
                .collect::<MathResult<Vec<_>>>()?,
        )),
        Expr::Mul(children) => {
            // n-ary product rule.
            let mut terms: Vec<Expr> = Vec::new();
            for (i, child) in children.iter().enumerate() {
                if !child.contains_symbol(var) {
                    continue;
                }
                let mut factors = vec![diff_node(child, var)?];
                for (j, other) in children.iter().enumerate() {
                    if i != j {
                        factors.push(other.clone());
                    }
                }
                terms.push(ast::mul(factors));
            }
            Ok(ast::add(terms))
        }
        Expr::Pow(base, exponent) => diff_power(base, exponent, var),
        Expr::Func(func, arg) => {
            if !arg.contains_symbol(var) {
                return Ok(ast::num(0));
            }
            let inner = diff_node(arg, var)?;
            let outer = match func {
                Func::Sin => Expr::Func(Func::Cos, arg.clone()),
                Func::Cos => ast::neg(Expr::Func(Func::Sin, arg.clone())),
                Func::Tan => ast::add(vec![
                    ast::pow(Expr::Func(Func::Tan, arg.clone()), ast::num(2)),
                    ast::num(1),
                ]),
                Func::Exp => Expr::Func(Func::Exp, arg.clone()),
                Func::Log => ast::pow((**arg).clone(), ast::num(-1)),
                Func::Sqrt => ast::div(
                    ast::num(1),
                    ast::mul(vec![ast::num(2), Expr::Func(Func::Sqrt, arg.clone())]),
                ),
            };
            Ok(ast::mul(vec![outer, inner]))
        }
        Expr::Integral { .. } | Expr::Derivative { .. } => Err(MathError::Unsupported(format!(
            "cannot differentiate the deferred construct {}",
            expr
        ))),
    }
}

fn diff_power(base: &Expr, exponent: &Expr, var: &str) -> MathResult<Expr> {
    let base_varies = base.contains_symbol(var);
    let exp_varies = exponent.contains_symbol(var);
    match (base_varies, exp_varies) {
        (false, false) => Ok(ast::num(0)),
        // d/dx u^c = c * u^(c-1) * u'
        (true, false) => Ok(ast::mul(vec![
            exponent.clone(),
            ast::pow(
                base.clone(),
                ast::add(vec![exponent.clone(), ast::num(-1)]),
            ),
            diff_node(base, var)?,
        ])),
        // d/dx c^u = c^u * log(c) * u'
        (false, true) => Ok(ast::mul(vec![
            ast::pow(base.clone(), exponent.clone()),
            Expr::Func(Func::Log, Box::new(base.clone())),
            diff_node(exponent, var)?,
        ])),
        // d/dx f^g = f^g * (g' log f + g f' / f)
        (true, true) => {
            let g_prime_log_f = ast::mul(vec![
                diff_node(exponent, var)?,
                Expr::Func(Func::Log, Box::new(base.clone())),
            ]);
            let g_f_prime_over_f = ast::mul(vec![
                exponent.clone(),
                diff_node(base, var)?,
                ast::pow(base.clone(), ast::num(-1)),
            ]);
            Ok(ast::mul(vec![
                ast::pow(base.clone(), exponent.clone()),
                ast::add(vec![g_prime_log_f, g_f_prime_over_f]),
            ]))
        }
    }
}

fn unsupported_integral(expr: &Expr) -> MathError {
    MathError::Unsupported(format!("no elementary antiderivative found for {}", expr))
}

fn antiderivative(
    expr: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> MathResult<Expr> {
    tracker.check(limits)?;
    if !expr.contains_symbol(var) {
        return Ok(ast::mul(vec![expr.clone(), ast::symbol(var)]));
    }
    match expr {
        Expr::Symbol(_) => Ok(ast::div(
            ast::pow(ast::symbol(var), ast::num(2)),
            ast::num(2),
        )),
        Expr::Add(children) => Ok(ast::add(
            children
                .iter()
                .map(|c| antiderivative(c, var, limits, tracker))
                .collect::<MathResult<Vec<_>>>()?,
        )),
        Expr::Mul(children) => {
            let (constants, varying): (Vec<Expr>, Vec<Expr>) = children
                .iter()
                .cloned()
                .partition(|c| !c.contains_symbol(var));
            if varying.len() != 1 {
                return Err(unsupported_integral(expr));
            }
            let inner = antiderivative(&varying[0], var, limits, tracker)?;
            let mut factors = constants;
            factors.push(inner);
            Ok(ast::mul(factors))
        }
        Expr::Pow(base, exponent) => {
            power_antiderivative(base, exponent, var, limits, tracker)
                .ok_or_else(|| unsupported_integral(expr))
        }
        Expr::Func(func, arg) => {
            // f(a*x + b): chain rule in reverse, divided by the slope.
            let Some((slope, _)) = linear_parts(arg, var, limits, tracker) else {
                return Err(unsupported_integral(expr));
            };
            let outer = match func {
                Func::Sin => ast::neg(Expr::Func(Func::Cos, arg.clone())),
                Func::Cos => Expr::Func(Func::Sin, arg.clone()),
                Func::Exp => Expr::Func(Func::Exp, arg.clone()),
                Func::Tan => ast::neg(Expr::Func(
                    Func::Log,
                    Box::new(Expr::Func(Func::Cos, arg.clone())),
                )),
                Func::Log => ast::add(vec![
                    ast::mul(vec![(**arg).clone(), Expr::Func(Func::Log, arg.clone())]),
                    ast::neg((**arg).clone()),
                ]),
                Func::Sqrt => ast::div(
                    ast::mul(vec![
                        ast::num(2),
                        ast::pow((**arg).clone(), Expr::Number(Decimal::new(15, 1))),
                    ]),
                    ast::num(3),
                ),
            };
            Ok(ast::div(outer, slope))
        }
        Expr::Integral { .. } | Expr::Derivative { .. } => Err(unsupported_integral(expr)),
        Expr::Number(_) => unreachable!("constants are handled above"),
    }
}

/// Antiderivative of `base ^ exponent` when a closed form is known.
fn power_antiderivative(
    base: &Expr,
    exponent: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> Option<Expr> {
    let base_varies = base.contains_symbol(var);
    let exp_varies = exponent.contains_symbol(var);
    if base_varies && exp_varies {
        return None;
    }
    if base_varies {
        // (a*x + b)^n -> (a*x + b)^(n+1) / (a*(n+1)), n != -1
        let (slope, _) = linear_parts(base, var, limits, tracker)?;
        if let Some(e) = exponent.as_number() {
            if e == -Decimal::ONE {
                let log = Expr::Func(Func::Log, Box::new(base.clone()));
                return Some(ast::div(log, slope));
            }
        }
        let next = ast::add(vec![exponent.clone(), ast::num(1)]);
        return Some(ast::div(
            ast::pow(base.clone(), next.clone()),
            ast::mul(vec![slope, next]),
        ));
    }
    // c^(a*x + b) -> c^(a*x + b) / (a * log(c))
    let (slope, _) = linear_parts(exponent, var, limits, tracker)?;
    let log_base = Expr::Func(Func::Log, Box::new(base.clone()));
    Some(ast::div(
        ast::pow(base.clone(), exponent.clone()),
        ast::mul(vec![slope, log_base]),
    ))
}

/// `(slope, intercept)` when `expr` is linear in `var`.
fn linear_parts(
    expr: &Expr,
    var: &str,
    limits: &ResourceLimits,
    tracker: &TimeoutTracker,
) -> Option<(Expr, Expr)> {
    let coeffs = polynomial_coefficients(expr, var, limits, tracker).ok()??;
    if coeffs.len() != 2 {
        return None;
    }
    let mut iter = coeffs.into_iter();
    let intercept = iter.next()?;
    let slope = iter.next()?;
    Some((slope, intercept))
}
