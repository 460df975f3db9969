//! Level curve.

use super::engine::{core_accessors, CurveCore, CurveKind, CurveValue, Horizon};
use super::interpolation::Interpolation;
use super::nodes::NodeSet;
use super::spline_adapter::Endpoints;
use super::traits::impl_date_curve;
use crate::config::CurveParams;
use crate::types::{BusinessDayConvention, Calendar, DayCountConvention, Result};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// A curve of levels (forward rates, spreads, fixings) indexed by date.
///
/// Interpolation and spline work on the raw node values, and the rate at a
/// date is the curve value itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCurve {
    pub(crate) core: CurveCore,
}

impl ValueCurve {
    /// Construct from a node set.
    pub fn new(nodes: NodeSet<f64>, params: CurveParams) -> Result<Self> {
        CurveCore::new(CurveKind::Value, nodes, params).map(|core| Self { core })
    }

    /// Construct from `(date, level)` pairs.
    pub fn from_pairs<I>(pairs: I, params: CurveParams) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(NodeSet::from_pairs(pairs)?, params)
    }

    core_accessors!();

    /// The curve value at `effective`; the other arguments are ignored.
    pub fn rate(
        &self,
        effective: NaiveDate,
        _termination: impl Into<Horizon>,
        _modifier: Option<BusinessDayConvention>,
    ) -> Result<Option<CurveValue>> {
        self.value(effective).map(Some)
    }

    /// Curve with `spread / 100` added to every node.
    pub fn shift(&self, spread: f64) -> Result<Self> {
        let nodes = self.core.real_nodes().map(|v| v + spread / 100.0);
        debug!(id = self.id(), spread, "shift value curve");
        let knots = self.core.knots().map(<[NaiveDate]>::to_vec);
        let core = self.core.derive(nodes, knots)?;
        Ok(Self { core })
    }

    /// Curve re-anchored at `start`, keeping the level there.
    ///
    /// # Errors
    /// - `TranslateDomain` when `start` is outside `(node[0], node[1]]`
    /// - `KnotTranslation` when `start` reaches the first interior knot
    pub fn translate(&self, start: NaiveDate, extend_knots: bool) -> Result<Self> {
        self.core.check_translate(start)?;
        let knots = self.core.translated_knots(start, extend_knots)?;
        let level = self.core.value_real(start)?;

        let nodes = self.core.real_nodes();
        let mut pairs: Vec<(NaiveDate, f64)> = nodes
            .iter()
            .skip(1)
            .filter(|(date, _)| *date != start)
            .map(|(date, v)| (date, *v))
            .collect();
        pairs.insert(0, (start, level));

        debug!(id = self.id(), %start, extend_knots, "translate value curve");
        let core = self.core.derive(NodeSet::from_pairs(pairs)?, knots)?;
        Ok(Self { core })
    }

    /// Curve moved along the date axis to `target` with levels unchanged.
    pub fn roll(&self, target: impl Into<Horizon>) -> Result<Self> {
        let anchor = self.anchor();
        let target = self.core.resolve(anchor, target.into(), None)?;
        if target == anchor {
            return Ok(self.clone());
        }
        let days = (target - anchor).num_days();

        let nodes = self.core.real_nodes();
        let mut pairs: Vec<(NaiveDate, f64)> = nodes
            .iter()
            .map(|(date, v)| (date + Duration::days(days), *v))
            .collect();
        if days > 0 {
            pairs.insert(0, (anchor, self.core.value_real(anchor)?));
        }

        debug!(id = self.id(), %target, days, "roll value curve");
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

impl_date_curve!(ValueCurve, CurveKind::Value);
