//! Date-indexed curves.
//!
//! This module provides:
//! - [`Curve`]: discount factor curve with log-space spline tail
//! - [`ValueCurve`]: level curve with a raw-value spline tail
//! - [`DateCurve`]: operations common to both
//! - [`CurveEnum`]: static dispatch over the two kinds
//! - [`NodeSet`]: ordered node storage
//! - [`Interpolation`] and [`InterpolationFn`]: local rules and user functions
//! - [`SplineAdapter`], [`Endpoints`]: spline boundary assembly
//! - [`CurveRecord`]: JSON persistence

mod curve;
mod curve_enum;
mod engine;
mod interpolation;
mod nodes;
mod record;
mod spline_adapter;
mod traits;
mod value_curve;

pub use curve::Curve;
pub use curve_enum::CurveEnum;
pub use engine::{CurveKind, CurveValue, Horizon};
pub use interpolation::{DynInterpolationFn, Interpolation, InterpolationFn};
pub use nodes::NodeSet;
pub use record::CurveRecord;
pub use spline_adapter::{
    day_ordinal, validate_knots, Endpoints, SplineAdapter, SplineEndpoint, SPLINE_ORDER,
};
pub use traits::DateCurve;
pub use value_curve::ValueCurve;
