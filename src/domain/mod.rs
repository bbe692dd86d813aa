//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - CSV rows and row filters (`CsvRow`, `RowFilter`, `YearFilter`, `AggregationMode`)
//! - per-year aggregates (`YearlyAggregate`)
//! - chart inputs (`SeriesSpec`, `CombinedChartData`, `PieData`, `ChartSpec`)

pub mod types;

pub use types::*;
