//! Local two-point interpolation rules.
//!
//! Each rule maps a bracket `(x1, y1)-(x2, y2)` and a query `x` to a value,
//! using the same formula inside the bracket and when extrapolating. Abscissae
//! are day ordinals; ordinates are any [`Number`](crate::types::Number), so
//! gradients flow through every rule.
//!
//! ## Available Rules
//!
//! | Name               | Transform                                  |
//! |--------------------|--------------------------------------------|
//! | `linear`           | none                                       |
//! | `log_linear`       | `ln` / `exp`                               |
//! | `linear_zero_rate` | zero rate from the anchor / discount factor|
//! | `flat_forward`     | left step                                  |
//! | `flat_backward`    | right step                                 |
//!
//! ## Example
//!
//! ```
//! use curve_core::math::interpolators::LocalInterpolation;
//!
//! let rule: LocalInterpolation = "Log_Linear".parse().unwrap();
//! let y = rule.interpolate(45.0, 0.0, &1.0_f64, 90.0, &0.98_f64, 0.0);
//! assert!((y - 0.98_f64.sqrt()).abs() < 1e-15);
//! ```

mod flat;
mod linear;
mod zero_rate;

#[cfg(test)]
mod ad_tests;

pub use flat::{flat_backward, flat_forward};
pub use linear::{linear, log_linear};
pub use zero_rate::linear_zero_rate;

use crate::types::{CurveError, Number, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A built-in local interpolation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalInterpolation {
    /// Linear in value.
    Linear,
    /// Linear in the logarithm of value.
    LogLinear,
    /// Linear in continuously compounded zero rate from the anchor.
    LinearZeroRate,
    /// Piecewise constant, taking the left node value.
    FlatForward,
    /// Piecewise constant, taking the right node value.
    FlatBackward,
}

impl LocalInterpolation {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            LocalInterpolation::Linear => "linear",
            LocalInterpolation::LogLinear => "log_linear",
            LocalInterpolation::LinearZeroRate => "linear_zero_rate",
            LocalInterpolation::FlatForward => "flat_forward",
            LocalInterpolation::FlatBackward => "flat_backward",
        }
    }

    /// Evaluate the rule at `x` over the bracket `(x1, y1)-(x2, y2)`.
    ///
    /// `anchor` is only used by `linear_zero_rate`.
    pub fn interpolate<T: Number>(
        &self,
        x: f64,
        x1: f64,
        y1: &T,
        x2: f64,
        y2: &T,
        anchor: f64,
    ) -> T {
        match self {
            LocalInterpolation::Linear => linear(x, x1, y1, x2, y2),
            LocalInterpolation::LogLinear => log_linear(x, x1, y1, x2, y2),
            LocalInterpolation::LinearZeroRate => linear_zero_rate(x, x1, y1, x2, y2, anchor),
            LocalInterpolation::FlatForward => flat_forward(x, x1, y1, x2, y2),
            LocalInterpolation::FlatBackward => flat_backward(x, x1, y1, x2, y2),
        }
    }
}

impl FromStr for LocalInterpolation {
    type Err = CurveError;

    /// Parses a rule name, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(LocalInterpolation::Linear),
            "log_linear" => Ok(LocalInterpolation::LogLinear),
            "linear_zero_rate" => Ok(LocalInterpolation::LinearZeroRate),
            "flat_forward" => Ok(LocalInterpolation::FlatForward),
            "flat_backward" => Ok(LocalInterpolation::FlatBackward),
            _ => Err(CurveError::UnknownInterpolation(s.to_string())),
        }
    }
}

impl fmt::Display for LocalInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for LocalInterpolation {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for LocalInterpolation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LocalInterpolation::from_str(&s).map_err(de::Error::custom)
    }
}
