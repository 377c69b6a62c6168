use crate::ast;
use crate::limits::{ResourceLimits, TimeoutTracker};
use crate::parser::parse;
use crate::simplify::{expand, simplify, substitute};

fn simplified(text: &str) -> String {
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse(text, &limits).unwrap();
    simplify(&expr, &limits, &tracker).unwrap().to_string()
}

fn expanded(text: &str) -> String {
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse(text, &limits).unwrap();
    expand(&expr, &limits, &tracker).unwrap().to_string()
}

#[test]
fn test_constant_folding() {
    assert_eq!(simplified("2 + 3"), "5");
    assert_eq!(simplified("2 \\cdot 3"), "6");
    assert_eq!(simplified("2^3"), "8");
}

#[test]
fn test_like_terms_collect() {
    assert_eq!(simplified("x + x"), "2*x");
    assert_eq!(simplified("2x + 3x"), "5*x");
    assert_eq!(simplified("x - x"), "0");
}

#[test]
fn test_multiplicative_identities() {
    assert_eq!(simplified("0 \\cdot x"), "0");
    assert_eq!(simplified("1x"), "x");
    assert_eq!(simplified("x/x"), "1");
}

#[test]
fn test_powers_combine() {
    assert_eq!(simplified("x x"), "x**2");
    assert_eq!(simplified("x^2 x^3"), "x**5");
    assert_eq!(simplified("(x^2)^3"), "x**6");
}

#[test]
fn test_exact_division_folds() {
    assert_eq!(simplified("\\frac{6}{3}"), "2");
    assert_eq!(simplified("\\frac{2}{4}"), "0.5");
}

#[test]
fn test_inexact_division_stays_symbolic() {
    // Never approximated to 0.333...
    assert_eq!(simplified("\\frac{1}{3}"), "1/3");
}

#[test]
fn test_exact_square_roots() {
    assert_eq!(simplified("\\sqrt{16}"), "4");
    assert_eq!(simplified("\\sqrt{2}"), "sqrt(2)");
}

#[test]
fn test_functions_at_known_points() {
    assert_eq!(simplified("\\sin(0)"), "0");
    assert_eq!(simplified("\\tan(0)"), "0");
    assert_eq!(simplified("\\cos(0)"), "1");
    assert_eq!(simplified("\\exp(0)"), "1");
    assert_eq!(simplified("\\ln(1)"), "0");
}

#[test]
fn test_terms_order_by_degree() {
    assert_eq!(simplified("1 + x + x^2"), "x**2 + x + 1");
}

#[test]
fn test_expand_distributes() {
    assert_eq!(expanded("2(x + 3)"), "2*x + 6");
    assert_eq!(expanded("(x + 1)(x - 1)"), "x**2 - 1");
}

#[test]
fn test_expand_binomial_power() {
    assert_eq!(expanded("(x + 1)^2"), "x**2 + 2*x + 1");
    assert_eq!(expanded("(x + y)^2"), "x**2 + 2*x*y + y**2");
}

#[test]
fn test_expand_caps_the_number_of_produced_terms() {
    // Ten terms to the eighth power would materialize 10^8 products.
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse("(a + b + c + d + e + f + g + h + i + j)^8", &limits).unwrap();
    let err = expand(&expr, &limits, &tracker).unwrap_err();
    assert!(err.to_string().contains("terms"));
}

#[test]
fn test_substitute() {
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse("x^2 + y", &limits).unwrap();
    let replaced = substitute(&expr, "x", &ast::num(3));
    assert_eq!(
        simplify(&replaced, &limits, &tracker).unwrap().to_string(),
        "y + 9"
    );
}

#[test]
fn test_simplifies_to_zero() {
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse("2 + 2 - 4", &limits).unwrap();
    assert!(expr.simplifies_to_zero(&limits, &tracker).unwrap());
    let expr = parse("2 + 2 - 5", &limits).unwrap();
    assert!(!expr.simplifies_to_zero(&limits, &tracker).unwrap());
}

#[test]
fn test_simplify_is_idempotent() {
    let limits = ResourceLimits::default();
    let tracker = TimeoutTracker::new();
    let expr = parse("3x + 2x^2 - x + 7", &limits).unwrap();
    let once = simplify(&expr, &limits, &tracker).unwrap();
    let twice = simplify(&once, &limits, &tracker).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.to_string(), "2*x**2 + 2*x + 7");
}
