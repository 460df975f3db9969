//! Tagged dual numbers for first and second order automatic differentiation.
//!
//! Unlike the single-direction reference types in num-dual, [`Dual`] and
//! [`Dual2`] carry a sparse gradient keyed by variable tag. Each curve node
//! becomes a variable tagged `"{curve_id}{node_index}"`, so values computed
//! from several curves keep derivatives with respect to every node of every
//! curve. Operands with different variable sets are merged on the fly.
//!
//! ## Usage
//!
//! ```
//! use curve_core::types::{Dual, Number};
//!
//! let x = Dual::variable(2.0, "x");
//! let y = Dual::variable(3.0, "y");
//! let z = x.clone() * y.clone() + x.ln();
//!
//! assert!((z.real() - (6.0 + 2.0_f64.ln())).abs() < 1e-15);
//! assert!((z.gradient("x") - (3.0 + 0.5)).abs() < 1e-15);
//! assert!((z.gradient("y") - 2.0).abs() < 1e-15);
//! assert_eq!(z.gradient("w"), 0.0);
//! ```

use super::Number;
use num_traits::{One, Zero};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

type Vars = Arc<Vec<String>>;

fn empty_vars() -> Vars {
    Arc::new(Vec::new())
}

fn same_vars(a: &Vars, b: &Vars) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

/// Union of two variable lists, `a` first, preserving order.
fn union_vars(a: &Vars, b: &Vars) -> Vars {
    if same_vars(a, b) || b.is_empty() {
        return a.clone();
    }
    if a.is_empty() {
        return b.clone();
    }
    let mut merged: Vec<String> = a.as_ref().clone();
    for var in b.iter() {
        if !merged.contains(var) {
            merged.push(var.clone());
        }
    }
    Arc::new(merged)
}

/// Position of each variable of `from` inside `to`.
fn positions(from: &Vars, to: &Vars) -> Vec<usize> {
    from.iter()
        .map(|v| to.iter().position(|w| w == v).unwrap_or(usize::MAX))
        .collect()
}

/// First order dual number with a tagged gradient.
///
/// The gradient vector is aligned with the variable list: `dual[i]` is the
/// partial derivative with respect to `vars[i]`.
#[derive(Debug, Clone)]
pub struct Dual {
    real: f64,
    vars: Vars,
    dual: Vec<f64>,
}

impl Dual {
    /// Construct from a real part, variable tags and matching gradient.
    ///
    /// Missing gradient entries are treated as zero.
    pub fn new(real: f64, vars: Vec<String>, dual: Vec<f64>) -> Self {
        let mut dual = dual;
        dual.resize(vars.len(), 0.0);
        Self {
            real,
            vars: Arc::new(vars),
            dual,
        }
    }

    /// Variable tags in gradient order.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Gradient aligned with [`Dual::vars`].
    pub fn dual(&self) -> &[f64] {
        &self.dual
    }

    /// Partial derivative with respect to `tag` (zero when absent).
    pub fn gradient(&self, tag: &str) -> f64 {
        self.vars
            .iter()
            .position(|v| v == tag)
            .map_or(0.0, |i| self.dual[i])
    }

    fn project(&self, vars: &Vars) -> Vec<f64> {
        if same_vars(&self.vars, vars) {
            return self.dual.clone();
        }
        let mut out = vec![0.0; vars.len()];
        for (i, p) in positions(&self.vars, vars).into_iter().enumerate() {
            if p != usize::MAX {
                out[p] = self.dual[i];
            }
        }
        out
    }

    /// Apply `f` with derivative `df` at `self.real`.
    fn chain(&self, f: f64, df: f64) -> Self {
        Self {
            real: f,
            vars: self.vars.clone(),
            dual: self.dual.iter().map(|g| g * df).collect(),
        }
    }
}

impl PartialEq for Dual {
    fn eq(&self, other: &Self) -> bool {
        if self.real != other.real {
            return false;
        }
        let vars = union_vars(&self.vars, &other.vars);
        self.project(&vars) == other.project(&vars)
    }
}

impl Add for Dual {
    type Output = Dual;

    fn add(self, rhs: Dual) -> Dual {
        let vars = union_vars(&self.vars, &rhs.vars);
        let a = self.project(&vars);
        let b = rhs.project(&vars);
        Dual {
            real: self.real + rhs.real,
            vars,
            dual: a.iter().zip(&b).map(|(x, y)| x + y).collect(),
        }
    }
}

impl Sub for Dual {
    type Output = Dual;

    fn sub(self, rhs: Dual) -> Dual {
        self + (-rhs)
    }
}

impl Mul for Dual {
    type Output = Dual;

    fn mul(self, rhs: Dual) -> Dual {
        let vars = union_vars(&self.vars, &rhs.vars);
        let a = self.project(&vars);
        let b = rhs.project(&vars);
        Dual {
            real: self.real * rhs.real,
            vars,
            dual: a
                .iter()
                .zip(&b)
                .map(|(ga, gb)| self.real * gb + rhs.real * ga)
                .collect(),
        }
    }
}

impl Div for Dual {
    type Output = Dual;

    fn div(self, rhs: Dual) -> Dual {
        let inv = 1.0 / rhs.real;
        self * rhs.chain(inv, -inv * inv)
    }
}

impl Neg for Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        self.chain(-self.real, -1.0)
    }
}

impl Add<f64> for Dual {
    type Output = Dual;

    fn add(mut self, rhs: f64) -> Dual {
        self.real += rhs;
        self
    }
}

impl Sub<f64> for Dual {
    type Output = Dual;

    fn sub(mut self, rhs: f64) -> Dual {
        self.real -= rhs;
        self
    }
}

impl Mul<f64> for Dual {
    type Output = Dual;

    fn mul(self, rhs: f64) -> Dual {
        self.chain(self.real * rhs, rhs)
    }
}

impl Div<f64> for Dual {
    type Output = Dual;

    fn div(self, rhs: f64) -> Dual {
        self.chain(self.real / rhs, 1.0 / rhs)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Dual::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.real == 0.0 && self.dual.iter().all(|g| *g == 0.0)
    }
}

impl One for Dual {
    fn one() -> Self {
        Dual::constant(1.0)
    }
}

impl From<f64> for Dual {
    fn from(value: f64) -> Self {
        Dual::constant(value)
    }
}

impl Number for Dual {
    const ORDER: u8 = 1;

    fn constant(value: f64) -> Self {
        Self {
            real: value,
            vars: empty_vars(),
            dual: Vec::new(),
        }
    }

    fn variable(value: f64, tag: &str) -> Self {
        Self {
            real: value,
            vars: Arc::new(vec![tag.to_string()]),
            dual: vec![1.0],
        }
    }

    fn ln(&self) -> Self {
        self.chain(self.real.ln(), 1.0 / self.real)
    }

    fn exp(&self) -> Self {
        let e = self.real.exp();
        self.chain(e, e)
    }

    fn powf(&self, n: f64) -> Self {
        self.chain(self.real.powf(n), n * self.real.powf(n - 1.0))
    }

    fn real(&self) -> f64 {
        self.real
    }
}

/// Second order dual number with a tagged gradient and Hessian.
///
/// The Hessian is stored row-major and in full: `hessian(a, b)` is
/// `∂²f / ∂a ∂b`.
#[derive(Debug, Clone)]
pub struct Dual2 {
    real: f64,
    vars: Vars,
    dual: Vec<f64>,
    dual2: Vec<f64>,
}

impl Dual2 {
    /// Construct from a real part, variable tags, gradient and row-major Hessian.
    ///
    /// Missing entries are treated as zero.
    pub fn new(real: f64, vars: Vec<String>, dual: Vec<f64>, dual2: Vec<f64>) -> Self {
        let n = vars.len();
        let mut dual = dual;
        let mut dual2 = dual2;
        dual.resize(n, 0.0);
        dual2.resize(n * n, 0.0);
        Self {
            real,
            vars: Arc::new(vars),
            dual,
            dual2,
        }
    }

    /// Variable tags in gradient order.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    /// Gradient aligned with [`Dual2::vars`].
    pub fn dual(&self) -> &[f64] {
        &self.dual
    }

    /// Partial derivative with respect to `tag` (zero when absent).
    pub fn gradient(&self, tag: &str) -> f64 {
        self.vars
            .iter()
            .position(|v| v == tag)
            .map_or(0.0, |i| self.dual[i])
    }

    /// Second partial derivative with respect to `a` and `b` (zero when absent).
    pub fn hessian(&self, a: &str, b: &str) -> f64 {
        let i = self.vars.iter().position(|v| v == a);
        let j = self.vars.iter().position(|v| v == b);
        match (i, j) {
            (Some(i), Some(j)) => self.dual2[i * self.vars.len() + j],
            _ => 0.0,
        }
    }

    /// Drop second order information.
    pub fn to_dual(&self) -> Dual {
        Dual {
            real: self.real,
            vars: self.vars.clone(),
            dual: self.dual.clone(),
        }
    }

    fn project(&self, vars: &Vars) -> (Vec<f64>, Vec<f64>) {
        if same_vars(&self.vars, vars) {
            return (self.dual.clone(), self.dual2.clone());
        }
        let n = vars.len();
        let m = self.vars.len();
        let pos = positions(&self.vars, vars);
        let mut g = vec![0.0; n];
        let mut h = vec![0.0; n * n];
        for i in 0..m {
            g[pos[i]] = self.dual[i];
            for j in 0..m {
                h[pos[i] * n + pos[j]] = self.dual2[i * m + j];
            }
        }
        (g, h)
    }

    /// Apply `f` with first derivative `df` and second derivative `d2f`.
    fn chain(&self, f: f64, df: f64, d2f: f64) -> Self {
        let n = self.vars.len();
        let mut dual2 = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                dual2.push(df * self.dual2[i * n + j] + d2f * self.dual[i] * self.dual[j]);
            }
        }
        Self {
            real: f,
            vars: self.vars.clone(),
            dual: self.dual.iter().map(|g| g * df).collect(),
            dual2,
        }
    }
}

impl PartialEq for Dual2 {
    fn eq(&self, other: &Self) -> bool {
        if self.real != other.real {
            return false;
        }
        let vars = union_vars(&self.vars, &other.vars);
        self.project(&vars) == other.project(&vars)
    }
}

impl Add for Dual2 {
    type Output = Dual2;

    fn add(self, rhs: Dual2) -> Dual2 {
        let vars = union_vars(&self.vars, &rhs.vars);
        let (ga, ha) = self.project(&vars);
        let (gb, hb) = rhs.project(&vars);
        Dual2 {
            real: self.real + rhs.real,
            vars,
            dual: ga.iter().zip(&gb).map(|(x, y)| x + y).collect(),
            dual2: ha.iter().zip(&hb).map(|(x, y)| x + y).collect(),
        }
    }
}

impl Sub for Dual2 {
    type Output = Dual2;

    fn sub(self, rhs: Dual2) -> Dual2 {
        self + (-rhs)
    }
}

impl Mul for Dual2 {
    type Output = Dual2;

    fn mul(self, rhs: Dual2) -> Dual2 {
        let vars = union_vars(&self.vars, &rhs.vars);
        let n = vars.len();
        let (ga, ha) = self.project(&vars);
        let (gb, hb) = rhs.project(&vars);
        let (a, b) = (self.real, rhs.real);
        let mut dual2 = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let k = i * n + j;
                dual2.push(a * hb[k] + b * ha[k] + ga[i] * gb[j] + gb[i] * ga[j]);
            }
        }
        Dual2 {
            real: a * b,
            vars,
            dual: ga.iter().zip(&gb).map(|(x, y)| a * y + b * x).collect(),
            dual2,
        }
    }
}

impl Div for Dual2 {
    type Output = Dual2;

    fn div(self, rhs: Dual2) -> Dual2 {
        let inv = 1.0 / rhs.real;
        self * rhs.chain(inv, -inv * inv, 2.0 * inv * inv * inv)
    }
}

impl Neg for Dual2 {
    type Output = Dual2;

    fn neg(self) -> Dual2 {
        self.chain(-self.real, -1.0, 0.0)
    }
}

impl Add<f64> for Dual2 {
    type Output = Dual2;

    fn add(mut self, rhs: f64) -> Dual2 {
        self.real += rhs;
        self
    }
}

impl Sub<f64> for Dual2 {
    type Output = Dual2;

    fn sub(mut self, rhs: f64) -> Dual2 {
        self.real -= rhs;
        self
    }
}

impl Mul<f64> for Dual2 {
    type Output = Dual2;

    fn mul(self, rhs: f64) -> Dual2 {
        self.chain(self.real * rhs, rhs, 0.0)
    }
}

impl Div<f64> for Dual2 {
    type Output = Dual2;

    fn div(self, rhs: f64) -> Dual2 {
        self.chain(self.real / rhs, 1.0 / rhs, 0.0)
    }
}

impl Zero for Dual2 {
    fn zero() -> Self {
        Dual2::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.real == 0.0
            && self.dual.iter().all(|g| *g == 0.0)
            && self.dual2.iter().all(|h| *h == 0.0)
    }
}

impl One for Dual2 {
    fn one() -> Self {
        Dual2::constant(1.0)
    }
}

impl From<f64> for Dual2 {
    fn from(value: f64) -> Self {
        Dual2::constant(value)
    }
}

impl Number for Dual2 {
    const ORDER: u8 = 2;

    fn constant(value: f64) -> Self {
        Self {
            real: value,
            vars: empty_vars(),
            dual: Vec::new(),
            dual2: Vec::new(),
        }
    }

    fn variable(value: f64, tag: &str) -> Self {
        Self {
            real: value,
            vars: Arc::new(vec![tag.to_string()]),
            dual: vec![1.0],
            dual2: vec![0.0],
        }
    }

    fn ln(&self) -> Self {
        let inv = 1.0 / self.real;
        self.chain(self.real.ln(), inv, -inv * inv)
    }

    fn exp(&self) -> Self {
        let e = self.real.exp();
        self.chain(e, e, e)
    }

    fn powf(&self, n: f64) -> Self {
        let x = self.real;
        self.chain(
            x.powf(n),
            n * x.powf(n - 1.0),
            n * (n - 1.0) * x.powf(n - 2.0),
        )
    }

    fn real(&self) -> f64 {
        self.real
    }
}
