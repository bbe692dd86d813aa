//! Dashboard configuration.
//!
//! A dashboard is a list of charts; each chart names its surface, kind,
//! display options, a default row filter and its series. A series may
//! override the chart filter. Files are plain JSON so they can be written by
//! hand or dumped from the built-in dashboard with `energy config`.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ChartKind, ChartOptions, LegendPosition, RowFilter, SeriesSpec, YearFilter};
use crate::error::AppError;

pub mod builtin;

pub use builtin::builtin_dashboard;

/// Environment variable supplying the default data root.
pub const ENV_DATA_ROOT: &str = "ENERGY_DATA_ROOT";
/// Environment variable supplying the default output directory.
pub const ENV_OUT_DIR: &str = "ENERGY_OUT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory or base URL that series paths are relative to.
    pub data_root: String,
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub surface: String,
    pub kind: ChartKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(default)]
    pub legend: LegendPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    pub filter: RowFilter,
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub path: String,
    pub label: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Overrides the chart-level filter for this series only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<RowFilter>,
}

impl ChartConfig {
    /// Resolve series tuples against the chart-level filter.
    pub fn series_specs(&self) -> Vec<SeriesSpec> {
        self.series
            .iter()
            .map(|s| SeriesSpec {
                path: s.path.clone(),
                label: s.label.clone(),
                color: s.color.clone(),
                border_color: s.border_color.clone(),
                filter: s.filter.clone().unwrap_or_else(|| self.filter.clone()),
            })
            .collect()
    }

    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            title: self.title.clone(),
            x_title: self.x_title.clone(),
            y_title: self.y_title.clone(),
            legend: self.legend,
            begin_at_zero: true,
            tension: self.tension,
        }
    }
}

impl DashboardConfig {
    pub fn chart(&self, surface: &str) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.surface == surface)
    }

    /// Reject configurations the renderers cannot bind unambiguously.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = std::collections::HashSet::new();
        for chart in &self.charts {
            if chart.surface.trim().is_empty() {
                return Err(AppError::new(2, "Chart surface ids must not be empty."));
            }
            if !seen.insert(chart.surface.as_str()) {
                return Err(AppError::new(
                    2,
                    format!("Duplicate chart surface '{}'.", chart.surface),
                ));
            }
            for series in &chart.series {
                let filter = series.filter.as_ref().unwrap_or(&chart.filter);
                if let YearFilter::Range { min, max } = filter.years {
                    if min > max {
                        return Err(AppError::new(
                            2,
                            format!(
                                "Series '{}' in chart '{}' has an empty year range {min}..={max}.",
                                series.label, chart.surface
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Read and validate a dashboard JSON file.
pub fn read_dashboard(path: &Path) -> Result<DashboardConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open dashboard config '{}': {e}", path.display())))?;
    let config: DashboardConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid dashboard config '{}': {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Pretty-printed JSON for a dashboard.
pub fn dashboard_to_json(config: &DashboardConfig) -> Result<String, AppError> {
    serde_json::to_string_pretty(config)
        .map_err(|e| AppError::new(2, format!("Failed to serialize dashboard config: {e}")))
}
