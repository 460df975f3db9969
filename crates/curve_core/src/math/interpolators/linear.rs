//! Linear and log-linear two-point interpolation.

use crate::types::Number;

/// Linear interpolation (or extrapolation) through `(x1, y1)` and `(x2, y2)`.
///
/// # Example
///
/// ```
/// use curve_core::math::interpolators::linear;
///
/// let y = linear(15.0, 10.0, &1.0_f64, 20.0, &2.0_f64);
/// assert!((y - 1.5).abs() < 1e-15);
/// ```
#[inline]
pub fn linear<T: Number>(x: f64, x1: f64, y1: &T, x2: f64, y2: &T) -> T {
    let f = (x - x1) / (x2 - x1);
    y1.clone() + (y2.clone() - y1.clone()) * f
}

/// Linear interpolation of `ln(y)`, mapped back through `exp`.
///
/// Produces a constant continuously compounded forward rate across the
/// segment when `y` are discount factors.
#[inline]
pub fn log_linear<T: Number>(x: f64, x1: f64, y1: &T, x2: f64, y2: &T) -> T {
    linear(x, x1, &y1.ln(), x2, &y2.ln()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_at_endpoints_and_midpoint() {
        assert_relative_eq!(linear(0.0, 0.0, &1.0, 10.0, &3.0), 1.0);
        assert_relative_eq!(linear(10.0, 0.0, &1.0, 10.0, &3.0), 3.0);
        assert_relative_eq!(linear(5.0, 0.0, &1.0, 10.0, &3.0), 2.0);
    }

    #[test]
    fn test_linear_extrapolates_with_same_formula() {
        assert_relative_eq!(linear(20.0, 0.0, &1.0, 10.0, &3.0), 5.0);
        assert_relative_eq!(linear(-10.0, 0.0, &1.0, 10.0, &3.0), -1.0);
    }

    #[test]
    fn test_log_linear_geometric_midpoint() {
        let y = log_linear(5.0, 0.0, &1.0, 10.0, &0.81);
        assert_relative_eq!(y, 0.9, epsilon = 1e-15);
    }
}
