//! Static dispatch over the curve kinds.

use super::engine::{CurveKind, CurveValue, Horizon};
use super::record::CurveRecord;
use super::{Curve, DateCurve, ValueCurve};
use crate::config::CurveDefaults;
use crate::types::{BusinessDayConvention, Result};
use chrono::NaiveDate;

/// Static dispatch enum wrapping both curve kinds.
///
/// Loading from JSON picks the variant from the record's `kind`.
///
/// # Example
///
/// ```
/// use curve_core::market_data::curves::{CurveEnum, CurveKind, DateCurve};
///
/// let json = r#"{"kind": "value", "nodes": {"2022-01-01": 2.0, "2022-07-01": 3.0}}"#;
/// let curve = CurveEnum::from_json(json).unwrap();
/// assert_eq!(curve.kind(), CurveKind::Value);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CurveEnum {
    /// Discount factor curve
    Discount(Curve),
    /// Level curve
    Value(ValueCurve),
}

macro_rules! each {
    ($self:expr, |$c:ident| $body:expr) => {
        match $self {
            CurveEnum::Discount($c) => $body,
            CurveEnum::Value($c) => $body,
        }
    };
}

impl CurveEnum {
    /// Deserialise from JSON using built-in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, &CurveDefaults::default())
    }

    /// Deserialise from JSON using `defaults` for missing fields.
    pub fn from_json_with(json: &str, defaults: &CurveDefaults) -> Result<Self> {
        let record = CurveRecord::from_json(json)?;
        match record.kind {
            CurveKind::Discount => Curve::from_record(record, defaults).map(CurveEnum::Discount),
            CurveKind::Value => ValueCurve::from_record(record, defaults).map(CurveEnum::Value),
        }
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        each!(self, |c| c.to_json())
    }

    /// Persistable record of the wrapped curve.
    pub fn to_record(&self) -> CurveRecord {
        each!(self, |c| c.to_record())
    }

    /// Node dates and real values.
    pub fn nodes(&self) -> Vec<(NaiveDate, f64)> {
        each!(self, |c| c.nodes().iter().map(|(d, v)| (d, *v)).collect())
    }
}

impl From<Curve> for CurveEnum {
    fn from(curve: Curve) -> Self {
        CurveEnum::Discount(curve)
    }
}

impl From<ValueCurve> for CurveEnum {
    fn from(curve: ValueCurve) -> Self {
        CurveEnum::Value(curve)
    }
}

impl DateCurve for CurveEnum {
    fn kind(&self) -> CurveKind {
        each!(self, |c| c.kind())
    }

    fn curve_id(&self) -> &str {
        each!(self, |c| c.curve_id())
    }

    fn anchor_date(&self) -> NaiveDate {
        each!(self, |c| c.anchor_date())
    }

    fn value_at(&self, date: NaiveDate) -> Result<CurveValue> {
        each!(self, |c| c.value_at(date))
    }

    fn rate_between(
        &self,
        effective: NaiveDate,
        termination: Horizon,
        modifier: Option<BusinessDayConvention>,
    ) -> Result<Option<CurveValue>> {
        each!(self, |c| c.rate_between(effective, termination, modifier))
    }

    fn shifted(&self, spread: f64) -> Result<Self> {
        match self {
            CurveEnum::Discount(c) => c.shifted(spread).map(CurveEnum::Discount),
            CurveEnum::Value(c) => c.shifted(spread).map(CurveEnum::Value),
        }
    }

    fn translated(&self, start: NaiveDate, extend_knots: bool) -> Result<Self> {
        match self {
            CurveEnum::Discount(c) => c.translated(start, extend_knots).map(CurveEnum::Discount),
            CurveEnum::Value(c) => c.translated(start, extend_knots).map(CurveEnum::Value),
        }
    }

    fn rolled(&self, target: Horizon) -> Result<Self> {
        match self {
            CurveEnum::Discount(c) => c.rolled(target).map(CurveEnum::Discount),
            CurveEnum::Value(c) => c.rolled(target).map(CurveEnum::Value),
        }
    }

    fn set_order(&mut self, order: u8) -> Result<()> {
        each!(self, |c| c.set_order(order))
    }
}
