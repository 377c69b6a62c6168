//! Conversion from grammar pairs to the symbolic tree

use crate::ast::{self, Expr, Func};
use crate::error::{MathError, MathResult};
use crate::limits::ResourceLimits;
use crate::parser::Rule;
use pest::iterators::Pair;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Builds [`Expr`] trees from parse pairs while enforcing the nesting
/// depth limit.
pub struct AstBuilder<'a> {
    limits: &'a ResourceLimits,
    depth: usize,
}

impl<'a> AstBuilder<'a> {
    pub fn new(limits: &'a ResourceLimits) -> Self {
        Self { limits, depth: 0 }
    }

    fn enter(&mut self) -> MathResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_expression_depth {
            return Err(MathError::Parse(format!(
                "expression nesting exceeds depth {}",
                self.limits.max_expression_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// `expr` and `integrand` share their shape: optional leading sign,
    /// then terms joined by `+`/`-`.
    pub fn build_expr(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        self.enter()?;
        let result = self.build_expr_inner(pair);
        self.leave();
        result
    }

    fn build_expr_inner(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut terms: Vec<Expr> = Vec::new();
        let mut negate_next = false;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::prefix_sign | Rule::add_op => {
                    negate_next = inner.as_str() == "-";
                }
                Rule::term | Rule::iterm => {
                    let term = self.build_term(inner)?;
                    terms.push(if negate_next { ast::neg(term) } else { term });
                    negate_next = false;
                }
                other => {
                    return Err(MathError::Parse(format!(
                        "unexpected {:?} in expression",
                        other
                    )))
                }
            }
        }
        Ok(ast::add(terms))
    }

    fn build_term(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        self.enter()?;
        let result = self.build_term_inner(pair);
        self.leave();
        result
    }

    fn build_term_inner(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut factors: Vec<Expr> = Vec::new();
        let mut divide_next = false;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::mul_op => {
                    divide_next = inner.as_str() == "/";
                }
                Rule::factor | Rule::ifactor => {
                    let factor = self.build_factor(inner)?;
                    factors.push(if divide_next {
                        ast::pow(factor, ast::num(-1))
                    } else {
                        factor
                    });
                    divide_next = false;
                }
                other => {
                    return Err(MathError::Parse(format!("unexpected {:?} in term", other)))
                }
            }
        }
        Ok(ast::mul(factors))
    }

    fn build_factor(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        self.enter()?;
        let result = self.build_factor_inner(pair);
        self.leave();
        result
    }

    fn build_factor_inner(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut base: Option<Expr> = None;
        let mut exponent: Option<Expr> = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                // `ifactor` wraps a plain factor behind the differential guard.
                Rule::factor => return self.build_factor_inner(inner),
                Rule::base => base = Some(self.build_base(inner)?),
                Rule::power => {
                    let exp_pair = inner
                        .into_inner()
                        .next()
                        .ok_or_else(|| MathError::Parse("empty exponent".to_string()))?;
                    exponent = Some(self.build_signed_atom(exp_pair)?);
                }
                other => {
                    return Err(MathError::Parse(format!(
                        "unexpected {:?} in factor",
                        other
                    )))
                }
            }
        }
        let base = base.ok_or_else(|| MathError::Parse("factor without base".to_string()))?;
        Ok(match exponent {
            Some(exponent) => ast::pow(base, exponent),
            None => base,
        })
    }

    /// `exponent` and `bound` both allow a brace group or a signed atom.
    fn build_signed_atom(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut negate = false;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::prefix_sign => negate = inner.as_str() == "-",
                Rule::brace_expr => {
                    let expr = self.build_group(inner)?;
                    return Ok(if negate { ast::neg(expr) } else { expr });
                }
                Rule::number => {
                    let n = parse_number(inner.as_str())?;
                    return Ok(Expr::Number(if negate { -n } else { n }));
                }
                Rule::symbol => {
                    let sym = ast::symbol(symbol_name(inner.as_str()));
                    return Ok(if negate { ast::neg(sym) } else { sym });
                }
                other => {
                    return Err(MathError::Parse(format!(
                        "unexpected {:?} in exponent",
                        other
                    )))
                }
            }
        }
        Err(MathError::Parse("empty exponent".to_string()))
    }

    fn build_group(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| MathError::Parse("empty group".to_string()))?;
        self.build_expr(inner)
    }

    fn build_base(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| MathError::Parse("empty base".to_string()))?;
        match inner.as_rule() {
            Rule::number => Ok(Expr::Number(parse_number(inner.as_str())?)),
            Rule::symbol => Ok(ast::symbol(symbol_name(inner.as_str()))),
            Rule::paren_expr | Rule::brace_expr => self.build_group(inner),
            Rule::frac => self.build_frac(inner),
            Rule::sqrt => self.build_sqrt(inner),
            Rule::func_call => self.build_func_call(inner),
            Rule::derivative => self.build_derivative(inner),
            Rule::integral => self.build_integral(inner),
            other => Err(MathError::Parse(format!("unexpected {:?} as base", other))),
        }
    }

    fn build_frac(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut groups = pair.into_inner();
        let numerator = groups
            .next()
            .ok_or_else(|| MathError::Parse("\\frac without numerator".to_string()))?;
        let denominator = groups
            .next()
            .ok_or_else(|| MathError::Parse("\\frac without denominator".to_string()))?;
        Ok(ast::div(
            self.build_group(numerator)?,
            self.build_group(denominator)?,
        ))
    }

    fn build_sqrt(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut index: Option<Expr> = None;
        let mut radicand: Option<Expr> = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::root_index => {
                    let expr_pair = inner
                        .into_inner()
                        .next()
                        .ok_or_else(|| MathError::Parse("empty root index".to_string()))?;
                    index = Some(self.build_expr(expr_pair)?);
                }
                Rule::brace_expr => radicand = Some(self.build_group(inner)?),
                _ => {}
            }
        }
        let radicand =
            radicand.ok_or_else(|| MathError::Parse("\\sqrt without radicand".to_string()))?;
        Ok(match index {
            // \sqrt[n]{x} is x^(1/n)
            Some(index) => ast::pow(radicand, ast::div(ast::num(1), index)),
            None => Expr::Func(Func::Sqrt, Box::new(radicand)),
        })
    }

    fn build_func_call(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut inner = pair.into_inner();
        let name = inner
            .next()
            .ok_or_else(|| MathError::Parse("function without name".to_string()))?;
        let func = match name.as_str() {
            "\\sin" => Func::Sin,
            "\\cos" => Func::Cos,
            "\\tan" => Func::Tan,
            "\\exp" => Func::Exp,
            "\\ln" | "\\log" => Func::Log,
            other => return Err(MathError::Parse(format!("unknown function {}", other))),
        };
        let arg_wrapper = inner
            .next()
            .ok_or_else(|| MathError::Parse("function without argument".to_string()))?;
        let arg_pair = arg_wrapper
            .into_inner()
            .next()
            .ok_or_else(|| MathError::Parse("empty function argument".to_string()))?;
        let arg = match arg_pair.as_rule() {
            Rule::paren_expr | Rule::brace_expr => self.build_group(arg_pair)?,
            Rule::factor => self.build_factor(arg_pair)?,
            other => {
                return Err(MathError::Parse(format!(
                    "unexpected {:?} as function argument",
                    other
                )))
            }
        };
        Ok(Expr::Func(func, Box::new(arg)))
    }

    fn build_derivative(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let form = pair
            .into_inner()
            .next()
            .ok_or_else(|| MathError::Parse("empty derivative".to_string()))?;
        let mut var: Option<String> = None;
        let mut operand: Option<Expr> = None;
        for inner in form.into_inner() {
            match inner.as_rule() {
                Rule::symbol => var = Some(symbol_name(inner.as_str())),
                Rule::term => operand = Some(self.build_term(inner)?),
                _ => {}
            }
        }
        let var = var.ok_or_else(|| {
            MathError::Parse("derivative without differentiation variable".to_string())
        })?;
        let operand =
            operand.ok_or_else(|| MathError::Parse("derivative without operand".to_string()))?;
        Ok(Expr::Derivative {
            inner: Box::new(operand),
            var,
        })
    }

    fn build_integral(&mut self, pair: Pair<Rule>) -> MathResult<Expr> {
        let mut bounds: Option<(Expr, Expr)> = None;
        let mut integrand: Option<Expr> = None;
        let mut var: Option<String> = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::int_bounds => {
                    // `_a^b` or `^b_a`; the grammar gives the pairs in
                    // written order, the `_` bound is always the lower one.
                    let written_sub_first = inner.as_str().starts_with('_');
                    let mut parts = inner.into_inner();
                    let first = self.build_signed_atom(parts.next().ok_or_else(|| {
                        MathError::Parse("integral bounds missing".to_string())
                    })?)?;
                    let second = self.build_signed_atom(parts.next().ok_or_else(|| {
                        MathError::Parse("integral bounds missing".to_string())
                    })?)?;
                    bounds = Some(if written_sub_first {
                        (first, second)
                    } else {
                        (second, first)
                    });
                }
                Rule::integrand => integrand = Some(self.build_expr(inner)?),
                Rule::differential => {
                    for diff_inner in inner.into_inner() {
                        if diff_inner.as_rule() == Rule::symbol {
                            var = Some(symbol_name(diff_inner.as_str()));
                        }
                    }
                }
                _ => {}
            }
        }
        let integrand =
            integrand.ok_or_else(|| MathError::Parse("integral without integrand".to_string()))?;
        Ok(Expr::Integral {
            integrand: Box::new(integrand),
            var,
            bounds: bounds.map(|(lower, upper)| (Box::new(lower), Box::new(upper))),
        })
    }
}

fn parse_number(text: &str) -> MathResult<Decimal> {
    Decimal::from_str(text).map_err(|e| MathError::Parse(format!("bad number '{}': {}", text, e)))
}

/// `\alpha` becomes `alpha`, `x_{12}` becomes `x_12`.
fn symbol_name(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\\' && *c != '{' && *c != '}')
        .collect()
}
