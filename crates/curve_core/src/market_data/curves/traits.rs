//! Date curve trait definition.

use super::engine::{CurveKind, CurveValue, Horizon};
use crate::types::{BusinessDayConvention, Result};
use chrono::NaiveDate;

/// Operations common to every date-indexed curve.
///
/// # Contract
///
/// - `value(date)` is the curve level at `date` at the current
///   differentiation order
/// - `shift`, `translate` and `roll` return new curves with fresh
///   identities and never mutate `self`
/// - `set_ad_order` is the only mutator
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::market_data::curves::{Curve, DateCurve};
/// use curve_core::config::CurveParams;
///
/// let d = |m| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
/// let curve = Curve::from_pairs(
///     vec![(d(1), 1.0), (d(4), 0.99), (d(7), 0.98)],
///     CurveParams::default(),
/// )
/// .unwrap();
///
/// fn level<C: DateCurve>(curve: &C, date: NaiveDate) -> f64 {
///     curve.value_at(date).unwrap().real()
/// }
/// assert_eq!(level(&curve, d(4)), 0.99);
/// ```
pub trait DateCurve: Sized {
    /// Semantics of the node values.
    fn kind(&self) -> CurveKind;

    /// Curve identity.
    fn curve_id(&self) -> &str;

    /// First node date.
    fn anchor_date(&self) -> NaiveDate;

    /// Curve value at `date`.
    fn value_at(&self, date: NaiveDate) -> Result<CurveValue>;

    /// Rate between `effective` and `termination`.
    ///
    /// `None` when the rate is undetermined.
    fn rate_between(
        &self,
        effective: NaiveDate,
        termination: Horizon,
        modifier: Option<BusinessDayConvention>,
    ) -> Result<Option<CurveValue>>;

    /// Curve with every node moved by `spread` basis points.
    fn shifted(&self, spread: f64) -> Result<Self>;

    /// Curve re-anchored at `start`.
    fn translated(&self, start: NaiveDate, extend_knots: bool) -> Result<Self>;

    /// Curve moved along the date axis to `target`.
    fn rolled(&self, target: Horizon) -> Result<Self>;

    /// Change the differentiation order in place.
    fn set_order(&mut self, order: u8) -> Result<()>;

    /// Real part of [`value_at`](Self::value_at).
    fn real_value(&self, date: NaiveDate) -> Result<f64> {
        self.value_at(date).map(|v| v.real())
    }
}

macro_rules! impl_date_curve {
    ($ty:ty, $kind:expr) => {
        impl $crate::market_data::curves::DateCurve for $ty {
            fn kind(&self) -> $crate::market_data::curves::CurveKind {
                $kind
            }

            fn curve_id(&self) -> &str {
                self.id()
            }

            fn anchor_date(&self) -> NaiveDate {
                self.anchor()
            }

            fn value_at(&self, date: NaiveDate) -> Result<CurveValue> {
                self.value(date)
            }

            fn rate_between(
                &self,
                effective: NaiveDate,
                termination: Horizon,
                modifier: Option<BusinessDayConvention>,
            ) -> Result<Option<CurveValue>> {
                self.rate(effective, termination, modifier)
            }

            fn shifted(&self, spread: f64) -> Result<Self> {
                self.shift(spread)
            }

            fn translated(&self, start: NaiveDate, extend_knots: bool) -> Result<Self> {
                self.translate(start, extend_knots)
            }

            fn rolled(&self, target: Horizon) -> Result<Self> {
                self.roll(target)
            }

            fn set_order(&mut self, order: u8) -> Result<()> {
                self.set_ad_order(order)
            }
        }
    };
}

pub(crate) use impl_date_curve;
