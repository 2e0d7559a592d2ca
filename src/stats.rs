use crate::error::StatsError;
use serde::Serialize;

/// Streaming accumulator of count, mean and spread (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct AccumulatorReport {
    pub count: usize,
    pub mean: f64,
    pub var: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn count(&self) -> usize {
        self.n_vals
    }

    /// Mean of the added values, `NaN` when nothing was added.
    pub fn mean(&self) -> f64 {
        if self.n_vals == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Unbiased sample variance, `NaN` with fewer than two values.
    pub fn sample_variance(&self) -> f64 {
        if self.n_vals > 1 {
            self.diff_2_sum / (self.n_vals as f64 - 1.0)
        } else {
            f64::NAN
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            count: self.n_vals,
            mean: self.mean(),
            var: self.sample_variance(),
            std_dev: self.std_dev(),
        }
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for val in iter {
            self.add(val);
        }
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Arithmetic mean of `vals`.
pub fn compute_mean(vals: &[f64]) -> Result<f64, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::DivisionByZero {
            op: "mean",
            count: 0,
        });
    }
    Ok(vals.iter().sum::<f64>() / vals.len() as f64)
}

/// Two-pass sample variance of `vals` (divides by `n - 1`).
pub fn compute_sample_variance(vals: &[f64]) -> Result<f64, StatsError> {
    let n_vals = vals.len();
    if n_vals < 2 {
        return Err(StatsError::DivisionByZero {
            op: "sample variance",
            count: n_vals,
        });
    }
    let mean = compute_mean(vals)?;
    let diff_2_sum = vals.iter().map(|&val| (val - mean).powi(2)).sum::<f64>();
    Ok(diff_2_sum / (n_vals - 1) as f64)
}

pub fn compute_std_dev(vals: &[f64]) -> Result<f64, StatsError> {
    compute_sample_variance(vals).map(f64::sqrt)
}
