//! Shared domain types.
//!
//! Everything here is serializable so the same types can be loaded from a
//! dashboard file, exported as JSON, and handed to a renderer.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One positional CSV row: `entity,code,year,value`.
///
/// Fields are borrowed from the source line; `code` is carried but unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvRow<'a> {
    pub entity: &'a str,
    pub code: Option<&'a str>,
    pub year: Option<&'a str>,
    pub value: Option<&'a str>,
}

/// Which years a row may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum YearFilter {
    /// Any year, as long as it starts with an integer.
    #[default]
    Any,
    Exact(i32),
    /// Inclusive on both ends.
    Range { min: i32, max: i32 },
}

impl YearFilter {
    pub fn accepts(&self, year: i64) -> bool {
        match *self {
            YearFilter::Any => true,
            YearFilter::Exact(target) => year == i64::from(target),
            YearFilter::Range { min, max } => year >= i64::from(min) && year <= i64::from(max),
        }
    }
}

/// How several matching rows for the same year are folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Add every matching row.
    #[default]
    Sum,
    /// Keep the last matching row in file order.
    Overwrite,
}

/// Entity + year + mode: the complete per-series row filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    pub entity: String,
    #[serde(default)]
    pub years: YearFilter,
    #[serde(default)]
    pub mode: AggregationMode,
}

impl RowFilter {
    pub fn new(entity: impl Into<String>, years: YearFilter, mode: AggregationMode) -> Self {
        Self {
            entity: entity.into(),
            years,
            mode,
        }
    }
}

/// Year (as it appeared in the file) -> accumulated value.
///
/// The `BTreeMap` keeps iteration deterministic; numeric ordering of the
/// keys is applied by the combiner, not here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyAggregate {
    values: BTreeMap<String, f64>,
}

impl YearlyAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, year: &str) -> Option<f64> {
        self.values.get(year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Fold one contribution in according to `mode`.
    pub fn record(&mut self, year: &str, value: f64, mode: AggregationMode) {
        match mode {
            AggregationMode::Sum => *self.values.entry(year.to_string()).or_insert(0.0) += value,
            AggregationMode::Overwrite => {
                self.values.insert(year.to_string(), value);
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for YearlyAggregate {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One named, coloured series and where its data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub path: String,
    pub label: String,
    pub color: String,
    /// Border colour when it differs from the fill colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub filter: RowFilter,
}

impl SeriesSpec {
    pub fn border(&self) -> &str {
        self.border_color.as_deref().unwrap_or(&self.color)
    }
}

/// A series after its values were aligned to the shared label axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub data: Vec<f64>,
}

/// Labels plus one aligned dataset per series.
///
/// Invariant: `dataset.data.len() == labels.len()` for every dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombinedChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Flat label/value/colour triple for pie charts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Area,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl LegendPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            LegendPosition::Top => "top",
            LegendPosition::Bottom => "bottom",
            LegendPosition::Left => "left",
            LegendPosition::Right => "right",
        }
    }
}

/// Display options forwarded to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(default)]
    pub legend: LegendPosition,
    #[serde(default = "default_true")]
    pub begin_at_zero: bool,
    /// Bezier tension for line/area charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl ChartOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_title: None,
            y_title: None,
            legend: LegendPosition::Top,
            begin_at_zero: true,
            tension: None,
        }
    }
}

/// Data handed to the renderer; pie charts use the flat triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartData {
    Series(CombinedChartData),
    Pie(PieData),
}

/// Everything a renderer needs to draw one chart on one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub surface: String,
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}
