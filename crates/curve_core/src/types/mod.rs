//! Core numeric, time and error types.
//!
//! This module provides:
//! - `number`: the [`Number`] trait every interpolation routine is generic over
//! - `dual`: tagged first and second order dual numbers ([`Dual`], [`Dual2`])
//! - `time`: day count, business day adjustment, calendars and tenors
//! - `error`: [`CurveError`] and its [`ErrorKind`] classification
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod dual;
pub mod error;
pub mod number;
pub mod time;

pub use dual::{Dual, Dual2};
pub use error::{CurveError, ErrorKind, Result};
pub use number::Number;
pub use time::{
    add_tenor, BusinessDayConvention, Calendar, CalendarDescriptor, DayCountConvention,
    NamedCalendar, Tenor, TenorUnit,
};
