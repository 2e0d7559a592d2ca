mod config;
mod describe;
mod error;
mod manager;
mod series;
mod stats;

use crate::manager::{Manager, OutputFormat};
use crate::series::SortOrder;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML file with the input datasets (built-in datasets when absent).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute mean and variance by hand and with the accumulator, then describe.
    Stats,

    /// Build a labeled series, sort it and access it by position and label.
    Series {
        /// Sort from largest to smallest value.
        #[arg(long)]
        descending: bool,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mgr = Manager::from_input(args.input, format).context("failed to construct mgr")?;

    let mut out = io::stdout().lock();
    match args.command {
        Command::Stats => mgr.run_stats(&mut out).context("failed to run stats")?,
        Command::Series { descending } => {
            let order = if descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            mgr.run_series(order, &mut out)
                .context("failed to run series")?
        }
    }

    Ok(())
}
