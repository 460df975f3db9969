//! Linear interpolation in continuously compounded zero rates.

use super::linear::linear;
use crate::types::Number;

/// Zero rate implied by a discount factor `y` at `x`, measured from `anchor`.
///
/// Time is `(x - anchor) / 365` years.
#[inline]
fn zero_rate<T: Number>(anchor: f64, x: f64, y: &T) -> T {
    y.ln() / ((anchor - x) / 365.0)
}

/// Interpolate the zero rates of `(x1, y1)` and `(x2, y2)` linearly and
/// convert back to a discount factor at `x`.
///
/// When `x1` is the anchor itself its zero rate is undefined and is taken
/// equal to the right endpoint's rate.
///
/// # Example
///
/// ```
/// use curve_core::math::interpolators::linear_zero_rate;
///
/// // A flat 2% zero curve is reproduced exactly.
/// let df = |t: f64| (-0.02 * t / 365.0_f64).exp();
/// let y = linear_zero_rate(200.0, 100.0, &df(100.0), 300.0, &df(300.0), 0.0);
/// assert!((y - df(200.0)).abs() < 1e-15);
/// ```
pub fn linear_zero_rate<T: Number>(x: f64, x1: f64, y1: &T, x2: f64, y2: &T, anchor: f64) -> T {
    let z2 = zero_rate(anchor, x2, y2);
    let z1 = if x1 == anchor {
        z2.clone()
    } else {
        zero_rate(anchor, x1, y1)
    };
    (linear(x, x1, &z1, x2, &z2) * ((anchor - x) / 365.0)).exp()
}
