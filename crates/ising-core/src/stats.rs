//! Sequence statistics used by the equilibration detector and the bias aggregation.
//!
//! None of these helpers return errors. Degenerate input (empty sequences,
//! a single sample for the standard deviation, constant abscissae for the
//! slope) produces NaN or an infinity so callers comparing against a
//! threshold simply never pass.

use serde::{Deserialize, Serialize};

/// Arithmetic mean. NaN for an empty sequence.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the `n - 1` denominator. NaN when fewer than two samples.
pub fn sample_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let avg = mean(values);
    let accum: f64 = values.iter().map(|x| (x - avg) * (x - avg)).sum();
    (accum / (values.len() - 1) as f64).sqrt()
}

struct Sums {
    n: f64,
    x: f64,
    y: f64,
    xx: f64,
    yy: f64,
    xy: f64,
}

fn sums(xs: &[f64], ys: &[f64]) -> Sums {
    debug_assert_eq!(xs.len(), ys.len(), "paired sequences must have equal length");
    let mut sums = Sums {
        n: xs.len().min(ys.len()) as f64,
        x: 0.0,
        y: 0.0,
        xx: 0.0,
        yy: 0.0,
        xy: 0.0,
    };
    for (x, y) in xs.iter().zip(ys.iter()) {
        sums.x += x;
        sums.y += y;
        sums.xx += x * x;
        sums.yy += y * y;
        sums.xy += x * y;
    }
    sums
}

/// Ordinary least-squares slope of `ys` against `xs` from the normal equations.
///
/// Constant `xs` make the denominator zero; the resulting NaN or infinity is
/// returned as is.
pub fn slope(xs: &[f64], ys: &[f64]) -> f64 {
    let s = sums(xs, ys);
    (s.n * s.xy - s.x * s.y) / (s.n * s.xx - s.x * s.x)
}

/// Covariance-over-variances ratio `(nΣxy − ΣxΣy) / ((nΣxx − (Σx)²)(nΣyy − (Σy)²))`.
///
/// This is not Pearson's r: the denominator is the product of the two
/// variance terms rather than the square root of that product, so the value
/// is unbounded and scales with the inputs.
pub fn correlation_like(xs: &[f64], ys: &[f64]) -> f64 {
    let s = sums(xs, ys);
    (s.n * s.xy - s.x * s.y) / ((s.n * s.xx - s.x * s.x) * (s.n * s.yy - s.y * s.y))
}

/// Mean and sample standard deviation of one column of run results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean of the column.
    pub mean: f64,
    /// Sample standard deviation of the column (NaN for fewer than two runs).
    pub stdev: f64,
}

impl Summary {
    /// Summarises the provided values.
    pub fn of(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            stdev: sample_stdev(values),
        }
    }
}
