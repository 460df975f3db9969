//! Piecewise polynomial splines in B-spline form.
//!
//! A [`PPSpline`] of order `k` over knot vector `t` is
//! `s(x) = Σ c_i B_{i,k}(x)` for `i` in `0..n`, with `n = len(t) - k`.
//! Basis functions follow the Cox–de Boor recursion. The last non-empty knot
//! interval is closed on the right, so evaluating at the final knot returns
//! the left limit; beyond the final knot every basis function is zero.
//!
//! Coefficients are obtained by collocation: given `n` breakpoints `tau`,
//! the first and last rows of the system may impose a derivative condition
//! (for example a zero second derivative for natural boundaries) while the
//! interior rows interpolate values.
//!
//! ## Example
//!
//! ```
//! use curve_core::math::spline::{PPSpline, SplineEvaluator};
//!
//! // Cubic interpolation of y = x^2 with not-a-knot style data.
//! let t = vec![0.0, 0.0, 0.0, 0.0, 2.0, 4.0, 4.0, 4.0, 4.0];
//! let tau = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let y: Vec<f64> = tau.iter().map(|x| x * x).collect();
//!
//! let spline = PPSpline::solve(4, t, &tau, &y, 0, 0).unwrap();
//! assert!((spline.evaluate(2.5) - 6.25).abs() < 1e-12);
//! ```

use crate::types::{CurveError, Number, Result};

/// Point evaluation of a solved spline.
pub trait SplineEvaluator<T> {
    /// Value at `x`.
    fn evaluate(&self, x: f64) -> T;

    /// `m`-th derivative at `x`.
    fn derivative(&self, x: f64, m: usize) -> T;
}

/// Piecewise polynomial spline of order `k` with coefficients of type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct PPSpline<T> {
    k: usize,
    t: Vec<f64>,
    c: Vec<T>,
}

fn validate_knots(k: usize, t: &[f64]) -> Result<usize> {
    if k == 0 {
        return Err(CurveError::KnotSequence("spline order must be positive".into()));
    }
    if t.len() <= k {
        return Err(CurveError::KnotSequence(format!(
            "{} knots cannot support order {}",
            t.len(),
            k
        )));
    }
    if t.windows(2).any(|w| w[1] < w[0]) {
        return Err(CurveError::KnotSequence("knots must be non-decreasing".into()));
    }
    Ok(t.len() - k)
}

/// Value of the basis function `B_{i,k}` at `x`.
///
/// # Arguments
/// * `t` - Knot vector
/// * `i` - Basis index, `0 <= i < len(t) - k`
/// * `k` - Order
/// * `x` - Evaluation point
pub fn basis(t: &[f64], i: usize, k: usize, x: f64) -> f64 {
    if k == 1 {
        let last = t[t.len() - 1];
        let inside = t[i] <= x && x < t[i + 1];
        let right_end = x == last && t[i] < t[i + 1] && t[i + 1] == last;
        return if inside || right_end { 1.0 } else { 0.0 };
    }
    let mut value = 0.0;
    let div1 = t[i + k - 1] - t[i];
    if div1 != 0.0 {
        value += (x - t[i]) / div1 * basis(t, i, k - 1, x);
    }
    let div2 = t[i + k] - t[i + 1];
    if div2 != 0.0 {
        value += (t[i + k] - x) / div2 * basis(t, i + 1, k - 1, x);
    }
    value
}

/// `m`-th derivative of the basis function `B_{i,k}` at `x`.
pub fn basis_derivative(t: &[f64], i: usize, k: usize, x: f64, m: usize) -> f64 {
    if m == 0 {
        return basis(t, i, k, x);
    }
    if k == 1 || m >= k {
        return 0.0;
    }
    let mut value = 0.0;
    let div1 = t[i + k - 1] - t[i];
    if div1 != 0.0 {
        value += basis_derivative(t, i, k - 1, x, m - 1) / div1;
    }
    let div2 = t[i + k] - t[i + 1];
    if div2 != 0.0 {
        value -= basis_derivative(t, i + 1, k - 1, x, m - 1) / div2;
    }
    value * (k - 1) as f64
}

/// Collocation matrix for breakpoints `tau`.
///
/// Row 0 holds the `left_n`-th derivative of each basis function at
/// `tau[0]`, the last row the `right_n`-th derivative at the last
/// breakpoint, and interior rows the basis values.
pub fn collocation_matrix(
    k: usize,
    t: &[f64],
    tau: &[f64],
    left_n: usize,
    right_n: usize,
) -> Vec<Vec<f64>> {
    let n = t.len() - k;
    let last = tau.len().saturating_sub(1);
    tau.iter()
        .enumerate()
        .map(|(row, &x)| {
            let m = match row {
                0 => left_n,
                r if r == last => right_n,
                _ => 0,
            };
            (0..n).map(|i| basis_derivative(t, i, k, x, m)).collect()
        })
        .collect()
}

/// Solve `a · c = b` by Gaussian elimination with scaled partial pivoting.
///
/// The matrix is real; the right-hand side may carry derivatives, which pass
/// through the elimination linearly.
///
/// # Errors
/// `SingularSystem` if a pivot is numerically zero relative to its row.
pub fn solve_linear<T: Number>(a: &[Vec<f64>], b: &[T]) -> Result<Vec<T>> {
    let n = b.len();
    let mut a: Vec<Vec<f64>> = a.to_vec();
    let mut b: Vec<T> = b.to_vec();
    let mut scale: Vec<f64> = a
        .iter()
        .map(|row| row.iter().fold(0.0_f64, |m, v| m.max(v.abs())))
        .collect();

    for col in 0..n {
        let mut pivot = col;
        let mut best = 0.0;
        for row in col..n {
            if scale[row] == 0.0 {
                continue;
            }
            let ratio = a[row][col].abs() / scale[row];
            if ratio > best {
                best = ratio;
                pivot = row;
            }
        }
        if best < 1e-12 {
            return Err(CurveError::SingularSystem { pivot: col });
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        scale.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[row][j] -= factor * a[col][j];
            }
            let update = b[col].clone() * factor;
            b[row] = b[row].clone() - update;
        }
    }

    let mut x: Vec<T> = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut acc = b[i].clone();
        for j in i + 1..n {
            if a[i][j] != 0.0 {
                acc = acc - x[j].clone() * a[i][j];
            }
        }
        x[i] = acc / a[i][i];
    }
    Ok(x)
}

impl<T: Number> PPSpline<T> {
    /// Construct from explicit coefficients.
    ///
    /// # Errors
    /// - `KnotSequence` if the knots are decreasing or too few for order `k`
    /// - `CoefficientCount` if `c.len() != len(t) - k`
    pub fn with_coefficients(k: usize, t: Vec<f64>, c: Vec<T>) -> Result<Self> {
        let n = validate_knots(k, &t)?;
        if c.len() != n {
            return Err(CurveError::CoefficientCount {
                got: c.len(),
                expected: n,
            });
        }
        Ok(Self { k, t, c })
    }

    /// Solve coefficients by collocation at breakpoints `tau`.
    ///
    /// # Arguments
    /// * `k` - Spline order
    /// * `t` - Knot vector
    /// * `tau` - Breakpoints, one per coefficient
    /// * `y` - Target values; `y[0]` and the last target refer to the
    ///   `left_n`-th and `right_n`-th derivatives respectively
    /// * `left_n`, `right_n` - Derivative order of the boundary rows
    ///
    /// # Errors
    /// - `KnotSequence` for an invalid knot vector
    /// - `DimensionMismatch` if `tau`, `y` and the coefficient count differ
    /// - `SingularSystem` if the collocation matrix is singular
    pub fn solve(
        k: usize,
        t: Vec<f64>,
        tau: &[f64],
        y: &[T],
        left_n: usize,
        right_n: usize,
    ) -> Result<Self> {
        let n = validate_knots(k, &t)?;
        if tau.len() != y.len() {
            return Err(CurveError::DimensionMismatch {
                rows: tau.len(),
                columns: y.len(),
            });
        }
        if tau.len() != n {
            return Err(CurveError::DimensionMismatch {
                rows: tau.len(),
                columns: n,
            });
        }
        let matrix = collocation_matrix(k, &t, tau, left_n, right_n);
        let c = solve_linear(&matrix, y)?;
        Ok(Self { k, t, c })
    }

    /// Spline order.
    pub fn order(&self) -> usize {
        self.k
    }

    /// Knot vector.
    pub fn knots(&self) -> &[f64] {
        &self.t
    }

    /// Coefficients, one per basis function.
    pub fn coefficients(&self) -> &[T] {
        &self.c
    }

    fn combine(&self, x: f64, m: usize) -> T {
        let mut acc = T::zero();
        for (i, c) in self.c.iter().enumerate() {
            let b = basis_derivative(&self.t, i, self.k, x, m);
            if b != 0.0 {
                acc = acc + c.clone() * b;
            }
        }
        acc
    }
}

impl<T: Number> SplineEvaluator<T> for PPSpline<T> {
    fn evaluate(&self, x: f64) -> T {
        self.combine(x, 0)
    }

    fn derivative(&self, x: f64, m: usize) -> T {
        self.combine(x, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dual;
    use approx::assert_relative_eq;

    fn clamped(interior: &[f64], a: f64, b: f64) -> Vec<f64> {
        let mut t = vec![a; 4];
        t.extend_from_slice(interior);
        t.extend(std::iter::repeat(b).take(4));
        t
    }

    #[test]
    fn test_basis_partition_of_unity() {
        let t = clamped(&[1.0, 2.5, 3.0], 0.0, 5.0);
        let n = t.len() - 4;
        for x in [0.0, 0.3, 1.0, 2.2, 2.5, 4.9, 5.0] {
            let total: f64 = (0..n).map(|i| basis(&t, i, 4, x)).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_basis_vanishes_beyond_last_knot() {
        let t = clamped(&[1.0, 2.0], 0.0, 3.0);
        let n = t.len() - 4;
        assert!((0..n).all(|i| basis(&t, i, 4, 3.5) == 0.0));
        assert!((0..n).all(|i| basis(&t, i, 4, -0.5) == 0.0));
    }

    #[test]
    fn test_right_end_value_is_last_basis() {
        let t = clamped(&[1.0, 2.0], 0.0, 3.0);
        let n = t.len() - 4;
        assert_eq!(basis(&t, n - 1, 4, 3.0), 1.0);
        assert_eq!(basis(&t, n - 2, 4, 3.0), 0.0);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let t = clamped(&[1.0, 2.0], 0.0, 3.0);
        let h = 1e-6;
        for i in 0..t.len() - 4 {
            let x = 1.3;
            let fd = (basis(&t, i, 4, x + h) - basis(&t, i, 4, x - h)) / (2.0 * h);
            assert_relative_eq!(basis_derivative(&t, i, 4, x, 1), fd, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_natural_spline_has_zero_curvature_at_ends() {
        let t = clamped(&[1.0, 2.0, 3.0], 0.0, 4.0);
        // natural: [t0, t0, interior..., t_last, t_last]
        let tau = [0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0];
        let y = [0.0, 1.0, 2.0, 0.5, 1.5, 3.0, 0.0];
        let spline = PPSpline::solve(4, t, &tau, &y, 2, 2).unwrap();
        assert_relative_eq!(spline.derivative(0.0, 2), 0.0, epsilon = 1e-12);
        assert_relative_eq!(spline.derivative(4.0, 2), 0.0, epsilon = 1e-12);
        for (x, v) in [(1.0, 2.0), (2.0, 0.5), (3.0, 1.5), (4.0, 3.0)] {
            assert_relative_eq!(spline.evaluate(x), v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cubic_reproduced_exactly() {
        let t = clamped(&[2.0], 0.0, 4.0);
        let f = |x: f64| x * x * x - 2.0 * x + 1.0;
        let tau = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = tau.iter().map(|x| f(*x)).collect();
        let spline = PPSpline::solve(4, t, &tau, &y, 0, 0).unwrap();
        for x in [0.5, 1.7, 3.9] {
            assert_relative_eq!(spline.evaluate(x), f(x), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let t = clamped(&[], 0.0, 1.0);
        let err = PPSpline::solve(4, t, &[0.0, 1.0], &[1.0, 2.0], 0, 0).unwrap_err();
        assert_eq!(err, CurveError::DimensionMismatch { rows: 2, columns: 4 });
    }

    #[test]
    fn test_singular_system_detected() {
        let t = clamped(&[], 0.0, 1.0);
        // Repeated breakpoint without a derivative condition.
        let err = PPSpline::solve(4, t, &[0.0, 0.5, 0.5, 1.0], &[1.0, 2.0, 2.0, 3.0], 0, 0)
            .unwrap_err();
        assert!(matches!(err, CurveError::SingularSystem { .. }));
    }

    #[test]
    fn test_coefficient_count_checked() {
        let t = clamped(&[], 0.0, 1.0);
        let err = PPSpline::with_coefficients(4, t, vec![1.0; 3]).unwrap_err();
        assert_eq!(err, CurveError::CoefficientCount { got: 3, expected: 4 });
    }

    #[test]
    fn test_decreasing_knots_rejected() {
        let err = PPSpline::with_coefficients(2, vec![0.0, 2.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, CurveError::KnotSequence(_)));
    }

    #[test]
    fn test_dual_targets_carry_sensitivities() {
        let t = clamped(&[2.0], 0.0, 4.0);
        let tau = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<Dual> = tau
            .iter()
            .enumerate()
            .map(|(i, x)| Dual::variable(x * 0.5, &format!("y{}", i)))
            .collect();
        let spline = PPSpline::solve(4, t, &tau, &y, 0, 0).unwrap();
        // At a breakpoint the spline depends only on that target.
        let v = spline.evaluate(3.0);
        assert_relative_eq!(v.real(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(v.gradient("y3"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.gradient("y1"), 0.0, epsilon = 1e-12);
    }
}
