//! Summary statistics of a value sequence.
//!
//! Count, mean and standard deviation come from a streaming
//! [`Accumulator`]; extremes and quartiles from the sorted values.

use crate::error::StatsError;
use crate::stats::Accumulator;
use serde::Serialize;
use std::fmt;

/// Descriptive statistics of a value sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `NaN` for a single value.
    pub std: f64,
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 50th percentile.
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
}

impl Description {
    /// Rows in display order, labeled the way tabular summaries usually are.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q1),
            ("50%", self.median),
            ("75%", self.q3),
            ("max", self.max),
        ]
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let vals: Vec<String> = rows.iter().map(|(_, val)| format!("{val:.6}")).collect();
        let width = vals.iter().map(String::len).max().unwrap_or(0);
        for ((name, _), val) in rows.iter().zip(&vals) {
            writeln!(f, "{name:<5} {val:>width$}")?;
        }
        Ok(())
    }
}

/// Compute the [`Description`] of `vals`.
pub fn describe(vals: &[f64]) -> Result<Description, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::DivisionByZero {
            op: "describe",
            count: 0,
        });
    }

    let acc: Accumulator = vals.iter().copied().collect();

    let mut sorted = vals.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(Description {
        count: acc.count(),
        mean: acc.mean(),
        std: acc.std_dev(),
        min: sorted[0],
        q1: compute_quantile(&sorted, 0.25),
        median: compute_quantile(&sorted, 0.5),
        q3: compute_quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Compute the `p`-th quantile of sorted values by linear interpolation
/// between closest ranks (R-7 method).
///
/// Returns `NaN` for empty input. `p` is clamped to `[0, 1]`.
pub fn compute_quantile(sorted_vals: &[f64], p: f64) -> f64 {
    debug_assert!(
        sorted_vals.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
        "values must be sorted in ascending order"
    );

    let n_vals = sorted_vals.len();
    if n_vals == 0 {
        return f64::NAN;
    }

    let h = (n_vals - 1) as f64 * p.clamp(0.0, 1.0);
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n_vals {
        sorted_vals[n_vals - 1]
    } else {
        (1.0 - g) * sorted_vals[j] + g * sorted_vals[j + 1]
    }
}
