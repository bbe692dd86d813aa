//! Terminal reports: aggregate tables and dashboard run summaries.

pub mod format;

pub use format::{DashboardOutputs, format_aggregate_report, format_dashboard_summary};
