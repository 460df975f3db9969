//! Numerical building blocks for curve evaluation.
//!
//! - [`bracket`]: interpolation bracket search over ordered keys
//! - [`interpolators`]: local two-point interpolation rules
//! - [`spline`]: piecewise polynomial B-splines with collocation solving
//!
//! Every routine is generic over [`Number`](crate::types::Number) so the same
//! code runs on `f64` and on dual numbers.

pub mod bracket;
pub mod interpolators;
pub mod spline;
