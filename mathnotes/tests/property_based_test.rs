use mathnotes::simplify::{simplify, substitute};
use mathnotes::solve::solve;
use mathnotes::{classify, parse, Equation, OperationKind, ResourceLimits, TimeoutTracker};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_classification_is_total(text in ".*") {
        // Any string maps to exactly one kind, without panicking.
        let kind = classify(&text);
        prop_assert!(matches!(
            kind,
            OperationKind::Equation
                | OperationKind::Integration
                | OperationKind::Differentiation
                | OperationKind::Expression
        ));
    }

    #[test]
    fn prop_integral_marker_always_wins(prefix in "[a-z =+]*", suffix in "[a-z =+]*") {
        let text = format!("{}\\int{}", prefix, suffix);
        prop_assert_eq!(classify(&text), OperationKind::Integration);
    }

    #[test]
    fn prop_derivative_marker_without_integral_differentiates(
        prefix in "[a-z =+]*",
        suffix in "[a-z =+]*",
    ) {
        let text = format!("{}d/d{}", prefix, suffix);
        prop_assert_eq!(classify(&text), OperationKind::Differentiation);
    }

    #[test]
    fn prop_equality_without_calculus_markers_is_an_equation(body in "[a-z0-9 +]*") {
        let text = format!("{}=1", body);
        prop_assert_eq!(classify(&text), OperationKind::Equation);
    }

    #[test]
    fn prop_marker_free_text_is_an_expression(text in "[a-z0-9 +]*") {
        prop_assert_eq!(classify(&text), OperationKind::Expression);
    }

    #[test]
    fn prop_parsing_never_panics(text in ".*") {
        let limits = ResourceLimits::default();
        let _ = parse(&text, &limits);
    }

    #[test]
    fn prop_simplification_is_idempotent(a in 1i64..10, b in 0i64..10, c in 0i64..10) {
        let limits = ResourceLimits::default();
        let tracker = TimeoutTracker::new();
        let text = format!("{}x^2 + {}x + {}", a, b, c);
        let expr = parse(&text, &limits).unwrap();
        let once = simplify(&expr, &limits, &tracker).unwrap();
        let twice = simplify(&once, &limits, &tracker).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_linear_solutions_satisfy_the_equation(a in 1i64..10, b in 0i64..10) {
        let limits = ResourceLimits::default();
        let tracker = TimeoutTracker::new();
        let lhs = parse(&format!("{}x + {}", a, b), &limits).unwrap();
        let equation = Equation::new(lhs.clone(), parse("0", &limits).unwrap());
        let found = solve(&equation, "x", &limits, &tracker).unwrap();
        prop_assert_eq!(found.len(), 1);
        let substituted = substitute(&lhs, "x", &found[0]);
        prop_assert!(substituted.simplifies_to_zero(&limits, &tracker).unwrap());
    }
}
