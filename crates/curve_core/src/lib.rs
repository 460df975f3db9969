//! # curve_core: date-indexed discount and value curves
//!
//! A curve is built from a small ordered set of `(date, value)` nodes. Dates
//! are interpolated locally between nodes under a chosen rule and, when a
//! knot vector is supplied, by a cubic B-spline tail (fitted to the log of
//! discount factors, or to raw levels). Curves can be evaluated as plain
//! `f64` or with first or second order derivatives with respect to every
//! node, so calibration and risk code can differentiate through them.
//!
//! ## Layout
//!
//! - `types`: [`Number`](types::Number), dual numbers, day counts,
//!   calendars, tenors and [`CurveError`](types::CurveError)
//! - `math`: bracket search, local interpolation rules, B-spline solving
//! - `market_data::curves`: [`Curve`](market_data::Curve),
//!   [`ValueCurve`](market_data::ValueCurve) and their persistence
//! - `config`: construction defaults loaded from TOML and the environment
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use curve_core::config::CurveParams;
//! use curve_core::market_data::Curve;
//!
//! let d = |m| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
//! let mut curve = Curve::from_pairs(
//!     vec![(d(1), 1.0), (d(4), 0.99), (d(7), 0.98)],
//!     CurveParams::default().with_id("usd_"),
//! )
//! .unwrap();
//!
//! // Sensitivities to each node
//! curve.set_ad_order(1).unwrap();
//! let df = curve.value(d(5)).unwrap();
//! assert!(df.gradient("usd_1") > 0.0);
//! assert!(df.gradient("usd_2") > 0.0);
//! assert_eq!(df.gradient("usd_0"), 0.0);
//!
//! // Parallel shift of overnight rates by 10bp
//! let shifted = curve.shift(10.0).unwrap();
//! assert!(shifted.value(d(7)).unwrap().real() < 0.98);
//! ```
//!
//! ## Feature Flags
//!
//! - `num-dual-mode` (default): implement [`Number`](types::Number) for
//!   `num_dual` reference types used to verify the built-in dual numbers

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod market_data;
pub mod math;
pub mod types;
