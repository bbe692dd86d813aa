//! Command-line parsing for the energy dashboard.
//!
//! Argument parsing and command dispatch stay separate from the data and
//! rendering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{AggregationMode, RowFilter, YearFilter};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "energy", version, about = "Renewable-energy dashboard builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build every chart of a dashboard and write it to the output directory.
    Dashboard(DashboardArgs),
    /// Aggregate a single CSV file and print the per-year result.
    Aggregate(AggregateArgs),
    /// Express a monthly household consumption (kWh) as a percentage.
    Calc(CalcArgs),
    /// Print the dashboard configuration as JSON.
    Config(ConfigArgs),
}

/// Output formats for `energy dashboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One HTML page rendering every chart with Chart.js.
    Html,
    /// One SVG file per chart.
    Svg,
    Both,
}

impl OutputFormat {
    pub fn html(self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::Both)
    }

    pub fn svg(self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Both)
    }
}

#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    /// Dashboard JSON (see `energy config`). Uses the built-in dashboard when omitted.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory or base URL the series paths are relative to.
    ///
    /// Falls back to $ENERGY_DATA_ROOT, then to the configuration's `data_root`.
    #[arg(short = 'd', long, value_name = "ROOT")]
    pub data_root: Option<String>,

    /// Output directory. Falls back to $ENERGY_OUT_DIR, then `dashboard`.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Also write each chart's data as CSV, plus all chart specs as JSON.
    #[arg(long = "export-data", value_name = "DIR")]
    pub export_data: Option<PathBuf>,

    /// SVG width in pixels.
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// SVG height in pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

#[derive(Debug, Parser, Clone)]
pub struct AggregateArgs {
    /// CSV path (relative to the data root) or absolute URL.
    #[arg(long, value_name = "PATH")]
    pub file: String,

    /// Entity (country/region) to keep.
    #[arg(short = 'e', long)]
    pub entity: String,

    /// Keep a single year.
    #[arg(short = 'y', long, conflicts_with_all = ["min", "max"])]
    pub year: Option<i32>,

    /// Lower bound of an inclusive year range.
    #[arg(long, requires = "max")]
    pub min: Option<i32>,

    /// Upper bound of an inclusive year range.
    #[arg(long, requires = "min")]
    pub max: Option<i32>,

    #[arg(short = 'm', long, value_enum, default_value_t = AggregationMode::Sum)]
    pub mode: AggregationMode,

    /// Directory or base URL for `--file`. Falls back to $ENERGY_DATA_ROOT, then `.`.
    #[arg(short = 'd', long, value_name = "ROOT")]
    pub data_root: Option<String>,

    /// Print the aggregate as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Export `year,value` rows to CSV.
    #[arg(long = "export-csv", value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Export the aggregate to JSON.
    #[arg(long = "export-json", value_name = "FILE")]
    pub export_json: Option<PathBuf>,
}

impl AggregateArgs {
    /// Translate the year flags into a row filter.
    pub fn filter(&self) -> Result<RowFilter, AppError> {
        let years = match (self.year, self.min, self.max) {
            (Some(year), _, _) => YearFilter::Exact(year),
            (None, Some(min), Some(max)) if min > max => {
                return Err(AppError::new(2, format!("Invalid year range: --min {min} is after --max {max}.")));
            }
            (None, Some(min), Some(max)) => YearFilter::Range { min, max },
            _ => YearFilter::Any,
        };
        Ok(RowFilter::new(self.entity.clone(), years, self.mode))
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CalcArgs {
    /// Monthly consumption in kWh.
    #[arg(allow_hyphen_values = true)]
    pub consumption: String,
}

#[derive(Debug, Parser, Clone)]
pub struct ConfigArgs {
    /// Validate and print this file instead of the built-in dashboard.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
