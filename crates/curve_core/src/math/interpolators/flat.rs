//! Piecewise constant interpolation.

use crate::types::Number;

/// Left-continuous step: the left value everywhere except exactly at `x2`.
#[inline]
pub fn flat_forward<T: Number>(x: f64, _x1: f64, y1: &T, x2: f64, y2: &T) -> T {
    if x == x2 {
        y2.clone()
    } else {
        y1.clone()
    }
}

/// Right-continuous step: the right value everywhere except exactly at `x1`.
#[inline]
pub fn flat_backward<T: Number>(x: f64, x1: f64, y1: &T, _x2: f64, y2: &T) -> T {
    if x == x1 {
        y1.clone()
    } else {
        y2.clone()
    }
}
