//! Symbolic expression tree
//!
//! Expressions are n-ary where it matters: sums and products are flat
//! vectors of children, which keeps like-term collection and constant
//! folding a single-level affair instead of a tree rotation exercise.
//! Division is a product with a negative power, subtraction a sum with
//! a negative coefficient.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;

/// Elementary functions the parser and calculus rules know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
}

impl Func {
    pub fn name(&self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
        }
    }
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Decimal),
    Symbol(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
    /// A deferred integral. `var` is absent when the markup omitted the
    /// differential; `bounds` is present for definite integrals.
    Integral {
        integrand: Box<Expr>,
        var: Option<String>,
        bounds: Option<(Box<Expr>, Box<Expr>)>,
    },
    /// A deferred derivative of `inner` with respect to `var`.
    Derivative {
        inner: Box<Expr>,
        var: String,
    },
}

/// An equality relation between two expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// Union of the free variables of both sides, sorted.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = self.lhs.free_symbols();
        symbols.extend(self.rhs.free_symbols());
        symbols
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}

pub fn num(value: i64) -> Expr {
    Expr::Number(Decimal::from(value))
}

pub fn symbol(name: impl Into<String>) -> Expr {
    Expr::Symbol(name.into())
}

pub fn add(terms: Vec<Expr>) -> Expr {
    match terms.len() {
        0 => num(0),
        1 => terms.into_iter().next().unwrap(),
        _ => Expr::Add(terms),
    }
}

pub fn mul(factors: Vec<Expr>) -> Expr {
    match factors.len() {
        0 => num(1),
        1 => factors.into_iter().next().unwrap(),
        _ => Expr::Mul(factors),
    }
}

pub fn pow(base: Expr, exponent: Expr) -> Expr {
    Expr::Pow(Box::new(base), Box::new(exponent))
}

pub fn neg(expr: Expr) -> Expr {
    mul(vec![num(-1), expr])
}

/// `numerator / denominator` as a product with a negative power.
pub fn div(numerator: Expr, denominator: Expr) -> Expr {
    mul(vec![numerator, pow(denominator, num(-1))])
}

impl Expr {
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(d) if d.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(d) if *d == Decimal::ONE)
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Expr::Number(d) => Some(*d),
            _ => None,
        }
    }

    /// Free variables of the expression, sorted by name.
    ///
    /// The variable of a definite integral is bound and excluded; an
    /// indefinite integral still depends on its variable, so it stays
    /// free (the antiderivative mentions it).
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, into: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                into.insert(name.clone());
            }
            Expr::Add(children) | Expr::Mul(children) => {
                for child in children {
                    child.collect_symbols(into);
                }
            }
            Expr::Pow(base, exponent) => {
                base.collect_symbols(into);
                exponent.collect_symbols(into);
            }
            Expr::Func(_, arg) => arg.collect_symbols(into),
            Expr::Integral {
                integrand,
                var,
                bounds,
            } => {
                let mut inner = BTreeSet::new();
                integrand.collect_symbols(&mut inner);
                match (var, bounds) {
                    // Definite integral: the integration variable is a dummy.
                    (Some(var), Some(_)) => {
                        inner.remove(var);
                    }
                    // Indefinite: the antiderivative mentions the variable
                    // even when the integrand does not.
                    (Some(var), None) => {
                        inner.insert(var.clone());
                    }
                    _ => {}
                }
                into.extend(inner);
                if let Some((lower, upper)) = bounds {
                    lower.collect_symbols(into);
                    upper.collect_symbols(into);
                }
            }
            Expr::Derivative { inner, var } => {
                inner.collect_symbols(into);
                into.insert(var.clone());
            }
        }
    }

    /// Does the expression mention `var` anywhere?
    pub fn contains_symbol(&self, var: &str) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Symbol(name) => name == var,
            Expr::Add(children) | Expr::Mul(children) => {
                children.iter().any(|c| c.contains_symbol(var))
            }
            Expr::Pow(base, exponent) => {
                base.contains_symbol(var) || exponent.contains_symbol(var)
            }
            Expr::Func(_, arg) => arg.contains_symbol(var),
            Expr::Integral {
                integrand, bounds, ..
            } => {
                integrand.contains_symbol(var)
                    || bounds.as_ref().is_some_and(|(lower, upper)| {
                        lower.contains_symbol(var) || upper.contains_symbol(var)
                    })
            }
            Expr::Derivative { inner, var: dv } => dv == var || inner.contains_symbol(var),
        }
    }
}

fn format_decimal(d: &Decimal) -> String {
    d.normalize().to_string()
}

/// A term written with an explicit negative coefficient, split into its
/// positive counterpart for ` - ` rendering in sums.
fn positive_counterpart(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Number(d) if d.is_sign_negative() && !d.is_zero() => Some(Expr::Number(-*d)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Number(d)) if d.is_sign_negative() => {
                let rest: Vec<Expr> = factors[1..].to_vec();
                if *d == -Decimal::ONE {
                    Some(mul(rest))
                } else {
                    let mut flipped = vec![Expr::Number(-*d)];
                    flipped.extend(rest);
                    Some(Expr::Mul(flipped))
                }
            }
            _ => None,
        },
        _ => None,
    }
}

fn needs_parens_as_factor(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_)) || matches!(expr, Expr::Number(d) if d.is_sign_negative())
}

fn needs_parens_as_base(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..))
        || matches!(expr, Expr::Number(d) if d.is_sign_negative())
}

fn fmt_factor(expr: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if needs_parens_as_factor(expr) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn fmt_product(factors: &[Expr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Negative exponents render as a trailing denominator.
    let mut numerator: Vec<&Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in factors {
        match factor {
            Expr::Pow(base, exponent) => match exponent.as_number() {
                Some(e) if e.is_sign_negative() => {
                    let flipped = -e;
                    if flipped == Decimal::ONE {
                        denominator.push((**base).clone());
                    } else {
                        denominator.push(pow((**base).clone(), Expr::Number(flipped)));
                    }
                }
                _ => numerator.push(factor),
            },
            _ => numerator.push(factor),
        }
    }

    let mut leading_minus = false;
    if let Some(Expr::Number(d)) = numerator.first() {
        if *d == -Decimal::ONE && numerator.len() > 1 {
            leading_minus = true;
            numerator.remove(0);
        }
    }
    if leading_minus {
        write!(f, "-")?;
    }
    if numerator.is_empty() {
        write!(f, "1")?;
    } else {
        for (i, factor) in numerator.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            fmt_factor(factor, f)?;
        }
    }
    if !denominator.is_empty() {
        write!(f, "/")?;
        if denominator.len() == 1 {
            let d = &denominator[0];
            if matches!(d, Expr::Add(_) | Expr::Mul(_)) {
                write!(f, "({})", d)?;
            } else {
                write!(f, "{}", d)?;
            }
        } else {
            write!(f, "(")?;
            for (i, d) in denominator.iter().enumerate() {
                if i > 0 {
                    write!(f, "*")?;
                }
                fmt_factor(d, f)?;
            }
            write!(f, ")")?;
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(d) => write!(f, "{}", format_decimal(d)),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        write!(f, "{}", term)?;
                    } else if let Some(positive) = positive_counterpart(term) {
                        write!(f, " - {}", positive)?;
                    } else {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => fmt_product(factors, f),
            Expr::Pow(base, exponent) => {
                // A bare reciprocal reads as a fraction, not a power.
                if let Some(e) = exponent.as_number() {
                    if e.is_sign_negative() {
                        let flipped = -e;
                        let denom = if flipped == Decimal::ONE {
                            (**base).clone()
                        } else {
                            pow((**base).clone(), Expr::Number(flipped))
                        };
                        return if matches!(denom, Expr::Add(_) | Expr::Mul(_)) {
                            write!(f, "1/({})", denom)
                        } else {
                            write!(f, "1/{}", denom)
                        };
                    }
                }
                if needs_parens_as_base(base) {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "**")?;
                match exponent.as_ref() {
                    Expr::Symbol(_) => write!(f, "{}", exponent),
                    Expr::Number(d) if !d.is_sign_negative() => write!(f, "{}", exponent),
                    other => write!(f, "({})", other),
                }
            }
            Expr::Func(func, arg) => write!(f, "{}({})", func.name(), arg),
            Expr::Integral {
                integrand,
                var,
                bounds,
            } => match (var, bounds) {
                (Some(v), Some((lower, upper))) => {
                    write!(f, "Integral({}, ({}, {}, {}))", integrand, v, lower, upper)
                }
                (Some(v), None) => write!(f, "Integral({}, {})", integrand, v),
                (None, _) => write!(f, "Integral({})", integrand),
            },
            Expr::Derivative { inner, var } => {
                write!(f, "Derivative({}, {})", inner, var)
            }
        }
    }
}
