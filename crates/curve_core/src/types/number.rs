//! Generic scalar abstraction shared by every interpolation and spline routine.
//!
//! Curves are evaluated under three numeric representations:
//!
//! | Order | Type                 | Carries                         |
//! |-------|----------------------|---------------------------------|
//! | 0     | `f64`                | value                           |
//! | 1     | [`Dual`](super::Dual)   | value, gradient                 |
//! | 2     | [`Dual2`](super::Dual2) | value, gradient, Hessian        |
//!
//! All engine code is written once against [`Number`] and monomorphised for
//! each representation. With the `num-dual-mode` feature, `num_dual::Dual64`
//! and `num_dual::Dual2_64` also implement [`Number`]; they carry a single
//! directional derivative and serve as reference types for verification.

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Arithmetic required of a curve node value.
///
/// # Contract
///
/// - `constant(x)` has zero derivative with respect to every variable
/// - `variable(x, tag)` has unit derivative with respect to `tag`
/// - `real()` discards all derivative information
///
/// # Example
///
/// ```
/// use curve_core::types::Number;
///
/// fn log_linear<T: Number>(y1: &T, y2: &T, f: f64) -> T {
///     (y1.ln() + (y2.ln() - y1.ln()) * f).exp()
/// }
///
/// let y = log_linear(&1.0_f64, &0.5_f64, 0.5);
/// assert!((y - 0.5_f64.sqrt()).abs() < 1e-15);
/// ```
pub trait Number:
    Clone
    + Debug
    + PartialEq
    + Send
    + Sync
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Differentiation order represented by this type.
    const ORDER: u8;

    /// Construct a value with zero derivative.
    fn constant(value: f64) -> Self;

    /// Construct an independent variable identified by `tag`.
    fn variable(value: f64, tag: &str) -> Self;

    /// Natural logarithm.
    fn ln(&self) -> Self;

    /// Exponential.
    fn exp(&self) -> Self;

    /// Real power.
    fn powf(&self, n: f64) -> Self;

    /// Real part.
    fn real(&self) -> f64;
}

impl Number for f64 {
    const ORDER: u8 = 0;

    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn variable(value: f64, _tag: &str) -> Self {
        value
    }

    #[inline]
    fn ln(&self) -> Self {
        f64::ln(*self)
    }

    #[inline]
    fn exp(&self) -> Self {
        f64::exp(*self)
    }

    #[inline]
    fn powf(&self, n: f64) -> Self {
        f64::powf(*self, n)
    }

    #[inline]
    fn real(&self) -> f64 {
        *self
    }
}

#[cfg(feature = "num-dual-mode")]
mod reference {
    //! Directional reference implementations backed by num-dual.
    //!
    //! Every `variable` is seeded with a unit derivative, so the dual part is
    //! the sensitivity to a simultaneous unit move of all variables.

    use super::Number;
    use num_dual::{Dual2_64, Dual64, DualNum};

    impl Number for Dual64 {
        const ORDER: u8 = 1;

        fn constant(value: f64) -> Self {
            Dual64::from(value)
        }

        fn variable(value: f64, _tag: &str) -> Self {
            Dual64::new(value, 1.0)
        }

        fn ln(&self) -> Self {
            DualNum::ln(self)
        }

        fn exp(&self) -> Self {
            DualNum::exp(self)
        }

        fn powf(&self, n: f64) -> Self {
            DualNum::powf(self, n)
        }

        fn real(&self) -> f64 {
            self.re
        }
    }

    impl Number for Dual2_64 {
        const ORDER: u8 = 2;

        fn constant(value: f64) -> Self {
            Dual2_64::from(value)
        }

        fn variable(value: f64, _tag: &str) -> Self {
            Dual2_64::new(value, 1.0, 0.0)
        }

        fn ln(&self) -> Self {
            DualNum::ln(self)
        }

        fn exp(&self) -> Self {
            DualNum::exp(self)
        }

        fn powf(&self, n: f64) -> Self {
            DualNum::powf(self, n)
        }

        fn real(&self) -> f64 {
            self.re
        }
    }
}
