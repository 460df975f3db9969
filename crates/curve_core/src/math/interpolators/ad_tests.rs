//! Automatic differentiation tests for the local interpolation rules.
//!
//! Gradients with respect to node values are checked against central finite
//! differences, and the tagged dual types against the num-dual references.

use super::*;
use crate::types::{Dual, Dual2};
use approx::assert_relative_eq;

const RULES: [LocalInterpolation; 3] = [
    LocalInterpolation::Linear,
    LocalInterpolation::LogLinear,
    LocalInterpolation::LinearZeroRate,
];

fn value(rule: LocalInterpolation, y1: f64, y2: f64) -> f64 {
    rule.interpolate(120.0, 90.0, &y1, 181.0, &y2, 0.0)
}

#[test]
fn test_first_order_matches_finite_difference() {
    let (y1, y2, h) = (0.99, 0.975, 1e-6);
    for rule in RULES {
        let d1 = Dual::variable(y1, "v0");
        let d2 = Dual::variable(y2, "v1");
        let result = rule.interpolate(120.0, 90.0, &d1, 181.0, &d2, 0.0);

        let fd1 = (value(rule, y1 + h, y2) - value(rule, y1 - h, y2)) / (2.0 * h);
        let fd2 = (value(rule, y1, y2 + h) - value(rule, y1, y2 - h)) / (2.0 * h);
        assert_relative_eq!(result.real(), value(rule, y1, y2), epsilon = 1e-15);
        assert_relative_eq!(result.gradient("v0"), fd1, epsilon = 1e-8);
        assert_relative_eq!(result.gradient("v1"), fd2, epsilon = 1e-8);
    }
}

#[test]
fn test_second_order_matches_finite_difference() {
    let (y1, y2, h) = (0.99, 0.975, 1e-4);
    for rule in RULES {
        let d1 = Dual2::variable(y1, "v0");
        let d2 = Dual2::variable(y2, "v1");
        let result = rule.interpolate(120.0, 90.0, &d1, 181.0, &d2, 0.0);

        let fd11 = (value(rule, y1 + h, y2) - 2.0 * value(rule, y1, y2)
            + value(rule, y1 - h, y2))
            / (h * h);
        let fd12 = (value(rule, y1 + h, y2 + h) - value(rule, y1 + h, y2 - h)
            - value(rule, y1 - h, y2 + h)
            + value(rule, y1 - h, y2 - h))
            / (4.0 * h * h);
        assert_relative_eq!(result.hessian("v0", "v0"), fd11, epsilon = 1e-5);
        assert_relative_eq!(result.hessian("v0", "v1"), fd12, epsilon = 1e-5);
        assert_relative_eq!(
            result.hessian("v0", "v1"),
            result.hessian("v1", "v0"),
            epsilon = 1e-15
        );
    }
}

#[cfg(feature = "num-dual-mode")]
mod reference {
    use super::*;
    use num_dual::{Dual2_64, Dual64};

    #[test]
    fn test_tagged_dual_matches_num_dual_direction() {
        // num-dual seeds every variable with a unit derivative, so its dual
        // part is the sum of the tagged gradient entries.
        for rule in RULES {
            let r1 = Dual64::new(0.99, 1.0);
            let r2 = Dual64::new(0.975, 1.0);
            let reference = rule.interpolate(120.0, 90.0, &r1, 181.0, &r2, 0.0);

            let d1 = Dual::variable(0.99, "v0");
            let d2 = Dual::variable(0.975, "v1");
            let tagged = rule.interpolate(120.0, 90.0, &d1, 181.0, &d2, 0.0);

            assert_relative_eq!(tagged.real(), reference.re, epsilon = 1e-15);
            assert_relative_eq!(
                tagged.gradient("v0") + tagged.gradient("v1"),
                reference.eps,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_tagged_dual2_matches_num_dual_direction() {
        for rule in RULES {
            let r1 = Dual2_64::new(0.99, 1.0, 0.0);
            let r2 = Dual2_64::new(0.975, 1.0, 0.0);
            let reference = rule.interpolate(120.0, 90.0, &r1, 181.0, &r2, 0.0);

            let d1 = Dual2::variable(0.99, "v0");
            let d2 = Dual2::variable(0.975, "v1");
            let t = rule.interpolate(120.0, 90.0, &d1, 181.0, &d2, 0.0);

            let directional = t.hessian("v0", "v0")
                + t.hessian("v0", "v1")
                + t.hessian("v1", "v0")
                + t.hessian("v1", "v1");
            assert_relative_eq!(directional, reference.v2, epsilon = 1e-10);
        }
    }
}
