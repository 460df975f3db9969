//! Discount factor curve.

use super::engine::{core_accessors, CurveCore, CurveKind, CurveValue, Horizon};
use super::interpolation::Interpolation;
use super::nodes::NodeSet;
use super::spline_adapter::Endpoints;
use super::traits::impl_date_curve;
use crate::config::CurveParams;
use crate::types::{
    BusinessDayConvention, Calendar, DayCountConvention, Result, Tenor, TenorUnit,
};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// A curve of discount factors indexed by date.
///
/// Dates up to the first spline knot (or all dates, without a spline) are
/// interpolated locally between nodes; later dates use a cubic spline fitted
/// to the log of the discount factors.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::config::CurveParams;
/// use curve_core::market_data::curves::Curve;
///
/// let d = |m| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
/// let curve = Curve::from_pairs(
///     vec![(d(1), 1.0), (d(4), 0.99), (d(7), 0.98), (d(10), 0.97)],
///     CurveParams::default(),
/// )
/// .unwrap();
///
/// let df = curve.value(d(5)).unwrap().real();
/// assert!(df < 0.99 && df > 0.98);
///
/// let rate = curve.rate(d(1), "3m".parse::<curve_core::types::Tenor>().unwrap(), None)
///     .unwrap()
///     .unwrap();
/// assert!(rate.real() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub(crate) core: CurveCore,
}

impl Curve {
    /// Construct from a node set.
    ///
    /// # Errors
    /// - `KnotSequence` for an invalid knot vector or coefficients without knots
    /// - `DimensionMismatch` if nodes and knots do not form a square system
    /// - `CoefficientCount` if frozen coefficients do not match the knots
    /// - `InvalidAdOrder` for orders above 2
    pub fn new(nodes: NodeSet<f64>, params: CurveParams) -> Result<Self> {
        CurveCore::new(CurveKind::Discount, nodes, params).map(|core| Self { core })
    }

    /// Construct from `(date, discount factor)` pairs.
    pub fn from_pairs<I>(pairs: I, params: CurveParams) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(NodeSet::from_pairs(pairs)?, params)
    }

    core_accessors!();

    /// Simple rate between `effective` and `termination`, in percent.
    ///
    /// A tenor termination is added to `effective` under `modifier` (the
    /// curve's own when `None`) and the curve's calendar. Returns `None`
    /// when the discount factor at termination is zero.
    ///
    /// # Errors
    /// `ZeroDayCount` when the two dates have no day count fraction.
    pub fn rate(
        &self,
        effective: NaiveDate,
        termination: impl Into<Horizon>,
        modifier: Option<BusinessDayConvention>,
    ) -> Result<Option<CurveValue>> {
        let modifier = modifier.unwrap_or_else(|| self.core.modifier());
        let termination = self
            .core
            .resolve(effective, termination.into(), Some(modifier))?;
        self.core.discount_rate(effective, termination)
    }

    /// Curve whose overnight forwards are all raised by `spread` basis points.
    ///
    /// Each node segment keeps its own per-day growth factor, lifted by
    /// `d * spread / 10000` with `d = 1/360` under Act360 and `1/365` otherwise.
    pub fn shift(&self, spread: f64) -> Result<Self> {
        let nodes = self.core.real_nodes();
        let day = self.core.day_factor();
        let dates = nodes.dates();
        let values = nodes.values();

        let mut shifted = Vec::with_capacity(values.len());
        shifted.push(values[0]);
        for i in 1..values.len() {
            let days = (dates[i] - dates[i - 1]).num_days() as f64;
            let growth = (values[i - 1] / values[i]).powf(1.0 / days);
            let previous = shifted[i - 1];
            shifted.push(previous / (growth + day * spread / 10_000.0).powf(days));
        }

        debug!(id = self.id(), spread, "shift discount curve");
        let knots = self.core.knots().map(<[NaiveDate]>::to_vec);
        let core = self.core.derive(NodeSet::new(dates.to_vec(), shifted)?, knots)?;
        Ok(Self { core })
    }

    /// Curve re-anchored at `start` with discount factor 1.0 there.
    ///
    /// `start` must lie in `(node[0], node[1]]`. Every remaining node is
    /// rescaled by `1 / value(start)`. With `extend_knots` the left clamped
    /// knots move to `start` when it falls inside the first knot interval.
    ///
    /// # Errors
    /// - `TranslateDomain` when `start` is outside the first node interval
    /// - `KnotTranslation` when `start` reaches the first interior knot
    pub fn translate(&self, start: NaiveDate, extend_knots: bool) -> Result<Self> {
        self.core.check_translate(start)?;
        let knots = self.core.translated_knots(start, extend_knots)?;
        let scalar = 1.0 / self.core.value_real(start)?;

        let nodes = self.core.real_nodes();
        let mut pairs: Vec<(NaiveDate, f64)> = nodes
            .iter()
            .skip(1)
            .filter(|(date, _)| *date != start)
            .map(|(date, v)| (date, v * scalar))
            .collect();
        pairs.insert(0, (start, 1.0));

        debug!(id = self.id(), %start, extend_knots, "translate discount curve");
        let core = self.core.derive(NodeSet::from_pairs(pairs)?, knots)?;
        Ok(Self { core })
    }

    /// Curve moved along the date axis to `target`.
    ///
    /// A tenor is measured from the anchor without adjustment. Node values
    /// are discounted at the curve's own overnight rate for the rolled days;
    /// rolling forward re-inserts the anchor at 1.0 and rolling backward
    /// translates the result back onto the original anchor. Rolling by zero
    /// days returns a copy with the same identity.
    pub fn roll(&self, target: impl Into<Horizon>) -> Result<Self> {
        let anchor = self.anchor();
        let target = self.core.resolve(anchor, target.into(), None)?;
        if target == anchor {
            return Ok(self.clone());
        }
        let days = (target - anchor).num_days();

        let overnight = Tenor::new(1, TenorUnit::Day);
        let on_rate = self
            .rate(anchor, overnight, Some(BusinessDayConvention::Unadjusted))?
            .map(|r| r.real())
            .unwrap_or(0.0);
        let scalar = 1.0 / (1.0 + on_rate * self.core.day_factor() / 100.0).powf(days as f64);

        let nodes = self.core.real_nodes();
        let mut pairs: Vec<(NaiveDate, f64)> = nodes
            .iter()
            .map(|(date, v)| (date + Duration::days(days), v * scalar))
            .collect();
        if days > 0 {
            pairs.insert(0, (anchor, 1.0));
        }

        debug!(id = self.id(), %target, days, on_rate, "roll discount curve");
        let rolled = Self {
            core: self
                .core
                .derive(NodeSet::from_pairs(pairs)?, self.core.rolled_knots(days))?,
        };
        if days < 0 {
            rolled.translate(anchor, false)
        } else {
            Ok(rolled)
        }
    }
}

impl_date_curve!(Curve, CurveKind::Discount);
