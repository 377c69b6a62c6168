use crate::ast::Expr;
use crate::limits::ResourceLimits;
use crate::parser::parse;

fn parsed(text: &str) -> Expr {
    parse(text, &ResourceLimits::default()).unwrap()
}

#[test]
fn test_leibniz_fraction_derivative() {
    let expr = parsed("\\frac{d}{dx} x^2");
    assert!(matches!(&expr, Expr::Derivative { var, .. } if var == "x"));
    assert_eq!(expr.to_string(), "Derivative(x**2, x)");
}

#[test]
fn test_partial_fraction_derivative() {
    let expr = parsed("\\frac{\\partial}{\\partial y} y^2");
    assert_eq!(expr.to_string(), "Derivative(y**2, y)");
}

#[test]
fn test_slash_derivative_forms() {
    assert_eq!(parsed("d/dy y^3").to_string(), "Derivative(y**3, y)");
    assert_eq!(parsed("∂/∂x x^2").to_string(), "Derivative(x**2, x)");
}

#[test]
fn test_derivative_operand_is_the_rest_of_the_term() {
    assert_eq!(parsed("\\frac{d}{dx} 2x").to_string(), "Derivative(2*x, x)");
}

#[test]
fn test_lone_d_is_still_a_symbol() {
    assert_eq!(parsed("d + 1").to_string(), "d + 1");
    assert_eq!(parsed("dx").to_string(), "d*x");
}

#[test]
fn test_indefinite_integral_with_differential() {
    let expr = parsed("\\int x^2 dx");
    assert!(matches!(
        &expr,
        Expr::Integral { var, bounds, .. }
            if var.as_deref() == Some("x") && bounds.is_none()
    ));
    assert_eq!(expr.to_string(), "Integral(x**2, x)");
}

#[test]
fn test_mathrm_differential() {
    assert_eq!(parsed("\\int x \\mathrm{d}x").to_string(), "Integral(x, x)");
}

#[test]
fn test_integral_without_differential() {
    assert_eq!(parsed("\\int x^2").to_string(), "Integral(x**2)");
}

#[test]
fn test_definite_integral_bounds() {
    assert_eq!(
        parsed("\\int_0^1 x dx").to_string(),
        "Integral(x, (x, 0, 1))"
    );
    // Superscript written first; `_` is still the lower bound.
    assert_eq!(
        parsed("\\int^1_0 x dx").to_string(),
        "Integral(x, (x, 0, 1))"
    );
}

#[test]
fn test_differential_is_not_swallowed_as_a_product() {
    let symbols = parsed("\\int x dx").free_symbols();
    assert_eq!(symbols.into_iter().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_definite_integration_variable_is_bound() {
    let symbols = parsed("\\int_0^y x dx").free_symbols();
    assert_eq!(symbols.into_iter().collect::<Vec<_>>(), vec!["y"]);
}

#[test]
fn test_indefinite_integral_variable_stays_free() {
    let symbols = parsed("\\int 5 dx").free_symbols();
    assert_eq!(symbols.into_iter().collect::<Vec<_>>(), vec!["x"]);
}
