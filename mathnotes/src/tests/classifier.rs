use crate::classifier::{classify, OperationKind};

#[test]
fn test_equality_sign_routes_to_equation() {
    assert_eq!(classify("x + 1 = 2"), OperationKind::Equation);
}

#[test]
fn test_plain_expression_is_default() {
    assert_eq!(classify("2x + 3"), OperationKind::Expression);
    assert_eq!(classify(""), OperationKind::Expression);
}

#[test]
fn test_integral_marker() {
    assert_eq!(classify("\\int x^2 dx"), OperationKind::Integration);
}

#[test]
fn test_derivative_markers() {
    assert_eq!(
        classify("\\frac{d}{dx} x^2"),
        OperationKind::Differentiation
    );
    assert_eq!(
        classify("\\frac{\\partial}{\\partial y} y^2"),
        OperationKind::Differentiation
    );
    assert_eq!(classify("d/dx x^2"), OperationKind::Differentiation);
    assert_eq!(classify("∂/∂x x^2"), OperationKind::Differentiation);
}

#[test]
fn test_integral_beats_equality() {
    assert_eq!(classify("\\int x dx = 5"), OperationKind::Integration);
}

#[test]
fn test_derivative_beats_equality() {
    assert_eq!(
        classify("\\frac{d}{dx} x^2 = 2x"),
        OperationKind::Differentiation
    );
}

#[test]
fn test_integral_beats_derivative() {
    assert_eq!(
        classify("\\int \\frac{d}{dx} x^2 dx"),
        OperationKind::Integration
    );
}

#[test]
fn test_bare_equals_is_still_an_equation() {
    // Unparseable, but routing happens before parsing.
    assert_eq!(classify("="), OperationKind::Equation);
}
