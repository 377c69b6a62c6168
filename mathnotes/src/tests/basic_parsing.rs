use crate::limits::ResourceLimits;
use crate::parser::{parse, preprocess};

fn parsed(text: &str) -> String {
    parse(text, &ResourceLimits::default()).unwrap().to_string()
}

#[test]
fn test_parse_number_and_symbol() {
    assert_eq!(parsed("42"), "42");
    assert_eq!(parsed("3.5"), "3.5");
    assert_eq!(parsed("x"), "x");
}

#[test]
fn test_implicit_multiplication() {
    assert_eq!(parsed("2x"), "2*x");
    assert_eq!(parsed("xy"), "x*y");
    assert_eq!(parsed("3.5x"), "3.5*x");
}

#[test]
fn test_explicit_multiplication_operators() {
    assert_eq!(parsed("2 \\cdot 3"), "2*3");
    assert_eq!(parsed("2 \\times x"), "2*x");
    assert_eq!(parsed("2 * x"), "2*x");
}

#[test]
fn test_addition_and_subtraction() {
    assert_eq!(parsed("x + 1"), "x + 1");
    assert_eq!(parsed("x - 3"), "x - 3");
    assert_eq!(parsed("-x + 5"), "-x + 5");
}

#[test]
fn test_powers() {
    assert_eq!(parsed("x^2"), "x**2");
    assert_eq!(parsed("x^{10}"), "x**10");
    assert_eq!(parsed("x^-2"), "1/x**2");
}

#[test]
fn test_fractions() {
    assert_eq!(parsed("\\frac{x}{2}"), "x/2");
    assert_eq!(parsed("x/2"), "x/2");
    assert_eq!(parsed("\\frac{x + 1}{y}"), "(x + 1)/y");
}

#[test]
fn test_parentheses() {
    assert_eq!(parsed("2(x + 3)"), "2*(x + 3)");
    assert_eq!(parsed("\\left( x + 1 \\right)^2"), "(x + 1)**2");
}

#[test]
fn test_functions() {
    assert_eq!(parsed("\\sin(x)"), "sin(x)");
    assert_eq!(parsed("\\cos{x}"), "cos(x)");
    assert_eq!(parsed("\\ln(x)"), "log(x)");
    assert_eq!(parsed("\\log(x)"), "log(x)");
    assert_eq!(parsed("\\exp(2x)"), "exp(2*x)");
}

#[test]
fn test_sqrt() {
    assert_eq!(parsed("\\sqrt{9}"), "sqrt(9)");
    assert_eq!(parsed("\\sqrt[3]{x}"), "x**(1/3)");
}

#[test]
fn test_greek_letters_and_subscripts() {
    assert_eq!(parsed("\\alpha + 1"), "alpha + 1");
    assert_eq!(parsed("x_1 + x_2"), "x_1 + x_2");
}

#[test]
fn test_empty_input_is_a_parse_error() {
    let limits = ResourceLimits::default();
    assert!(parse("", &limits).is_err());
    assert!(parse("   ", &limits).is_err());
}

#[test]
fn test_unknown_command_is_a_parse_error() {
    let limits = ResourceLimits::default();
    let err = parse("\\unknowncmd{x}", &limits).unwrap_err();
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn test_input_size_limit() {
    let limits = ResourceLimits {
        max_input_bytes: 8,
        ..ResourceLimits::default()
    };
    let err = parse("x + 100000", &limits).unwrap_err();
    assert!(err.to_string().contains("byte limit"));
}

#[test]
fn test_nesting_depth_limit() {
    let limits = ResourceLimits {
        max_expression_depth: 4,
        ..ResourceLimits::default()
    };
    assert!(parse("((((x))))", &limits).is_err());
    assert!(parse("x", &limits).is_ok());
}

#[test]
fn test_preprocess_collapses_double_backslashes() {
    assert_eq!(preprocess("\\\\int x dx"), "\\int x dx");
}

#[test]
fn test_preprocess_repairs_times_in_derivatives() {
    assert_eq!(
        preprocess("\\frac{d}{d\\times} x^2"),
        "\\frac{d}{dx} x^2"
    );
    assert_eq!(preprocess("d/d\\times x^2"), "d/dx x^2");
    assert_eq!(preprocess("d/d \\times x"), "d/dx x");
}
