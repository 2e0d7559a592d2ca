use crate::config::Config;
use crate::describe::Description;
use crate::series::{Label, Series, SortOrder};
use crate::stats::{AccumulatorReport, compute_mean, compute_sample_variance, compute_std_dev};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{io::Write, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub average: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub accumulator: AccumulatorReport,
    pub description: Description,
}

#[derive(Debug, Serialize)]
pub struct Entry {
    pub label: Label,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub series: Series,
    pub sorted: Series,
    pub first_value: f64,
    pub position: isize,
    pub at_position: Entry,
    pub head: Series,
    pub lookup: Option<Entry>,
}

/// Runs the demonstrations on the configured datasets and writes the results.
pub struct Manager {
    cfg: Config,
    format: OutputFormat,
}

impl Manager {
    pub fn new(cfg: Config, format: OutputFormat) -> Self {
        Self { cfg, format }
    }

    /// Construct a [`Manager`] from an optional config file.
    pub fn from_input<P: AsRef<Path>>(input: Option<P>, format: OutputFormat) -> Result<Self> {
        let cfg = match input {
            Some(file) => Config::from_file(file).context("failed to construct cfg")?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        Ok(Self::new(cfg, format))
    }

    pub fn stats_report(&self) -> Result<StatsReport> {
        let vals = &self.cfg.stats.values;

        let average = compute_mean(vals).context("failed to compute average")?;
        log::debug!("average of {} values: {average}", vals.len());
        let variance = compute_sample_variance(vals).context("failed to compute variance")?;
        log::debug!("variance of {} values: {variance}", vals.len());
        let std_dev = compute_std_dev(vals).context("failed to compute standard deviation")?;

        let series = Series::new(vals.clone());
        let accumulator = series.accumulator().report();
        let description = series.describe().context("failed to describe values")?;

        Ok(StatsReport {
            average,
            variance,
            std_dev,
            accumulator,
            description,
        })
    }

    pub fn series_report(&self, order: SortOrder) -> Result<SeriesReport> {
        let cfg = &self.cfg.series;

        let series = match &cfg.labels {
            Some(labels) => Series::with_labels(cfg.values.clone(), labels.iter().cloned())
                .context("failed to construct series")?,
            None => Series::new(cfg.values.clone()),
        };
        log::debug!("constructed series of length {}", series.len());

        let sorted = match order {
            SortOrder::Ascending => series.sort_values(),
            SortOrder::Descending => series.sort_values_by(order),
        };
        log::debug!("sorted labels: {:?}", sorted.labels());

        let first_value = *series.values().first().context("series has no values")?;

        let (label, value) = sorted
            .iloc(cfg.position)
            .with_context(|| format!("failed to access position {}", cfg.position))?;
        let at_position = Entry {
            label: label.clone(),
            value,
        };

        let n_head = cfg.head.min(sorted.len());
        let head = sorted
            .iloc_slice(..n_head as isize)
            .with_context(|| format!("failed to take first {n_head} entries"))?;

        let lookup = match &cfg.lookup {
            Some(label) => {
                let n_matches = sorted.loc_all(label.clone()).len();
                if n_matches > 1 {
                    log::warn!("label '{label}' appears {n_matches} times, using the first match");
                }
                let value = sorted
                    .loc(label.clone())
                    .with_context(|| format!("failed to access label '{label}'"))?;
                Some(Entry {
                    label: label.clone(),
                    value,
                })
            }
            None => None,
        };

        Ok(SeriesReport {
            series,
            sorted,
            first_value,
            position: cfg.position,
            at_position,
            head,
            lookup,
        })
    }

    pub fn run_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = self.stats_report()?;
        match self.format {
            OutputFormat::Json => write_json(out, &report)?,
            OutputFormat::Text => {
                writeln!(out, "Average: {}", report.average)?;
                writeln!(out, "Variance: {}", report.variance)?;
                writeln!(out, "Standard deviation: {}", report.std_dev)?;
                writeln!(out, "Average using Accumulator: {}", report.accumulator.mean)?;
                writeln!(out, "Variance using Accumulator: {}", report.accumulator.var)?;
                writeln!(out, "Details about the data:")?;
                write!(out, "{}", report.description)?;
            }
        }
        Ok(())
    }

    pub fn run_series<W: Write>(&self, order: SortOrder, out: &mut W) -> Result<()> {
        let report = self.series_report(order)?;
        match self.format {
            OutputFormat::Json => write_json(out, &report)?,
            OutputFormat::Text => {
                writeln!(out, "Series:\n{}\n", report.series)?;
                writeln!(out, "Sorted by value:\n{}\n", report.sorted)?;
                writeln!(out, "First value: {}", report.first_value)?;
                writeln!(
                    out,
                    "Entry at position {}: {} {}",
                    report.position, report.at_position.label, report.at_position.value
                )?;
                if !report.head.is_empty() {
                    writeln!(out, "First {} entries:\n{}", report.head.len(), report.head)?;
                }
                if let Some(entry) = &report.lookup {
                    writeln!(out, "Value labeled {}: {}", entry.label, entry.value)?;
                }
            }
        }
        Ok(())
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize report")?;
    writeln!(out)?;
    Ok(())
}
