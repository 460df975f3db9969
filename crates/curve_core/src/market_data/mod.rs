//! Market data structures.
//!
//! # Components
//!
//! - [`curves`]: discount factor and level curves indexed by date
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use curve_core::config::CurveParams;
//! use curve_core::market_data::curves::Curve;
//!
//! let d = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
//! let curve = Curve::from_pairs(
//!     vec![(d(2022, 1), 1.0), (d(2023, 1), 0.97)],
//!     CurveParams::default(),
//! )
//! .unwrap();
//!
//! // Re-anchor one month later; the new anchor discounts to exactly 1.0.
//! let moved = curve.translate(d(2022, 2), false).unwrap();
//! assert_eq!(moved.value(d(2022, 2)).unwrap().real(), 1.0);
//! ```

pub mod curves;

pub use curves::{Curve, CurveEnum, CurveKind, CurveValue, DateCurve, NodeSet, ValueCurve};
