//! Data preparation: aggregate CSV rows per year, then combine series.

pub mod aggregate;
pub mod combine;
pub mod numeric;

pub use aggregate::{AggregateReport, SkippedRow, aggregate_or_empty, aggregate_rows, load_aggregate};
pub use combine::{combine, pie_from_series};
