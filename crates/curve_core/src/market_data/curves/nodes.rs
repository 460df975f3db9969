//! Ordered node storage.

use crate::types::{CurveError, Number, Result};
use chrono::NaiveDate;

/// Ordered mapping of dates to node values.
///
/// Dates are strictly increasing and the set is never empty; the first date
/// is the curve's anchor. Dates and values are kept in parallel vectors so
/// bracket search runs directly on the date slice.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::market_data::curves::NodeSet;
///
/// let d = |m| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
/// let nodes = NodeSet::from_pairs(vec![(d(1), 1.0), (d(4), 0.99)]).unwrap();
/// assert_eq!(nodes.anchor(), d(1));
/// assert_eq!(nodes.len(), 2);
/// assert!(NodeSet::from_pairs(vec![(d(4), 1.0), (d(1), 0.99)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSet<T> {
    dates: Vec<NaiveDate>,
    values: Vec<T>,
}

impl<T> NodeSet<T> {
    /// Construct from parallel date and value vectors.
    ///
    /// # Errors
    /// - `InsufficientData` if empty
    /// - `DimensionMismatch` if the lengths differ
    /// - `UnorderedNodes` if the dates are not strictly increasing
    pub fn new(dates: Vec<NaiveDate>, values: Vec<T>) -> Result<Self> {
        if dates.is_empty() {
            return Err(CurveError::InsufficientData { got: 0, need: 1 });
        }
        if dates.len() != values.len() {
            return Err(CurveError::DimensionMismatch {
                rows: dates.len(),
                columns: values.len(),
            });
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CurveError::UnorderedNodes {
                previous: w[0],
                date: w[1],
            });
        }
        Ok(Self { dates, values })
    }

    /// Construct from `(date, value)` pairs in order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, T)>,
    {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(dates, values)
    }

    /// The first node date.
    #[inline]
    pub fn anchor(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Node dates in order.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Node values aligned with [`NodeSet::dates`].
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false; a node set holds at least the anchor.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value stored at exactly `date`, if it is a node.
    pub fn get(&self, date: NaiveDate) -> Option<&T> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| &self.values[i])
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &T)> {
        self.dates.iter().copied().zip(self.values.iter())
    }

    /// Apply `f` to every value, keeping the dates.
    pub fn map<U, F>(&self, f: F) -> NodeSet<U>
    where
        F: FnMut(&T) -> U,
    {
        NodeSet {
            dates: self.dates.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }
}

impl<T: Number> NodeSet<T> {
    /// Drop all derivative information.
    pub fn to_real(&self) -> NodeSet<f64> {
        self.map(Number::real)
    }
}

impl NodeSet<f64> {
    /// Re-tag every value as an independent variable `"{id}{index}"`.
    pub fn tagged<T: Number>(&self, id: &str) -> NodeSet<T> {
        NodeSet {
            dates: self.dates.clone(),
            values: self
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| T::variable(*v, &format!("{}{}", id, i)))
                .collect(),
        }
    }
}
