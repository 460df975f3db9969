//! Interpolation selection: a built-in local rule or a user function.

use super::nodes::NodeSet;
use crate::math::interpolators::LocalInterpolation;
use crate::types::{CurveError, Dual, Dual2, Number, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A user supplied date → value function.
///
/// The function receives the query date and the full node set, and must be
/// written generically so it can run at every differentiation order.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::market_data::curves::{InterpolationFn, NodeSet};
/// use curve_core::types::Number;
///
/// /// Always returns the last node value.
/// struct LastNode;
///
/// impl InterpolationFn for LastNode {
///     fn evaluate<T: Number>(&self, _date: NaiveDate, nodes: &NodeSet<T>) -> T {
///         nodes.values()[nodes.len() - 1].clone()
///     }
/// }
/// ```
pub trait InterpolationFn: Send + Sync {
    /// Value at `date` given the curve's nodes.
    fn evaluate<T: Number>(&self, date: NaiveDate, nodes: &NodeSet<T>) -> T;
}

/// Object-safe form of [`InterpolationFn`], one method per numeric type.
///
/// Implemented for every [`InterpolationFn`]; it does not need to be
/// implemented by hand.
pub trait DynInterpolationFn: Send + Sync {
    /// Plain evaluation.
    fn evaluate_f64(&self, date: NaiveDate, nodes: &NodeSet<f64>) -> f64;
    /// First order evaluation.
    fn evaluate_dual(&self, date: NaiveDate, nodes: &NodeSet<Dual>) -> Dual;
    /// Second order evaluation.
    fn evaluate_dual2(&self, date: NaiveDate, nodes: &NodeSet<Dual2>) -> Dual2;
}

impl<F: InterpolationFn> DynInterpolationFn for F {
    fn evaluate_f64(&self, date: NaiveDate, nodes: &NodeSet<f64>) -> f64 {
        self.evaluate(date, nodes)
    }

    fn evaluate_dual(&self, date: NaiveDate, nodes: &NodeSet<Dual>) -> Dual {
        self.evaluate(date, nodes)
    }

    fn evaluate_dual2(&self, date: NaiveDate, nodes: &NodeSet<Dual2>) -> Dual2 {
        self.evaluate(date, nodes)
    }
}

/// How a curve evaluates dates outside its spline region.
#[derive(Clone)]
pub enum Interpolation {
    /// A built-in two-point rule applied within the node bracket.
    Local(LocalInterpolation),
    /// A user function that replaces bracket logic entirely.
    Custom(Arc<dyn DynInterpolationFn>),
}

impl Interpolation {
    /// Wrap a user function.
    pub fn custom<F: InterpolationFn + 'static>(f: F) -> Self {
        Interpolation::Custom(Arc::new(f))
    }

    /// Rule name, or `"custom"` for a user function.
    pub fn name(&self) -> &'static str {
        match self {
            Interpolation::Local(rule) => rule.name(),
            Interpolation::Custom(_) => "custom",
        }
    }

    /// The built-in rule, if any.
    pub fn local(&self) -> Option<LocalInterpolation> {
        match self {
            Interpolation::Local(rule) => Some(*rule),
            Interpolation::Custom(_) => None,
        }
    }
}

impl From<LocalInterpolation> for Interpolation {
    fn from(rule: LocalInterpolation) -> Self {
        Interpolation::Local(rule)
    }
}

impl FromStr for Interpolation {
    type Err = CurveError;

    /// Parses a built-in rule name. `"custom"` cannot be parsed.
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<LocalInterpolation>().map(Interpolation::Local)
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Local(rule) => f.debug_tuple("Local").field(rule).finish(),
            Interpolation::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Interpolation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Interpolation::Local(a), Interpolation::Local(b)) => a == b,
            (Interpolation::Custom(a), Interpolation::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
