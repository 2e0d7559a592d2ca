use crate::series::Label;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

const MAX_N_VALS: usize = 1_000_000;

/// Input datasets.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading. The default holds the built-in
/// datasets.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub series: SeriesConfig,
}

/// Dataset for the descriptive statistics demonstration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsConfig {
    /// Values to summarize.
    pub values: Vec<f64>,
}

/// Dataset for the labeled series demonstration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// Series values.
    pub values: Vec<f64>,
    /// Labels paired with `values` (positions when absent).
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    /// Position to read from the sorted series.
    #[serde(default)]
    pub position: isize,
    /// Number of leading entries to show.
    #[serde(default = "default_head")]
    pub head: usize,
    /// Label to look up (skipped when absent).
    #[serde(default)]
    pub lookup: Option<Label>,
}

fn default_head() -> usize {
    3
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            values: vec![1.0, 2.0, 3.0, 8.0, 9.0, 27.0, 35.0, 58.0, 63.0, 65.0],
        }
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        let labels = [
            "Tapioca",
            "Marceline",
            "Frida",
            "Bambu",
            "Jennie",
            "Stacy",
            "Frodo",
            "Naniquinha",
            "Mon Cherri",
        ];
        Self {
            values: vec![3.0, 1.0, 8.0, 9.0, 3.0, 1.0, 8.0, 2.0, 1.0],
            labels: Some(labels.into_iter().map(Label::from).collect()),
            position: 0,
            head: default_head(),
            lookup: Some(Label::from("Tapioca")),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded. Sections left out take their default
    /// values. Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_vec(&self.stats.values, 2..=MAX_N_VALS).context("invalid statistics values")?;

        let series = &self.series;
        check_vec(&series.values, 1..=MAX_N_VALS).context("invalid series values")?;
        let n_vals = series.values.len();
        if let Some(labels) = &series.labels {
            check_num(labels.len(), n_vals..=n_vals).context("invalid number of series labels")?;
        }
        check_num(series.head, 0..=MAX_N_VALS).context("invalid number of head entries")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_vec<R>(vec: &[f64], len_range: R) -> Result<()>
where
    R: RangeBounds<usize> + Debug,
{
    check_num(vec.len(), len_range).context("invalid vector length")?;
    if let Some(i_ele) = vec.iter().position(|ele| !ele.is_finite()) {
        bail!("vector must have only finite elements, but element {i_ele} is {}", vec[i_ele]);
    }
    Ok(())
}
