//! Static SVG charts drawn with plotters.
//!
//! One file per surface: `<out_dir>/<surface>.svg`. Disposing a handle
//! removes its file, so a re-render never leaves a stale chart behind.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::domain::{ChartData, ChartKind, ChartOptions, ChartSpec, CombinedChartData, LegendPosition, PieData};
use crate::error::AppError;
use crate::render::color::color_or_fallback;
use crate::render::{ChartRenderer, RenderHandle};

type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

const DEFAULT_SIZE: (u32, u32) = (1000, 600);

/// A chart written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgChart {
    pub surface: String,
    pub path: PathBuf,
}

impl RenderHandle for SvgChart {
    fn dispose(self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::new(
                4,
                format!("Failed to remove chart '{}': {e}", self.path.display()),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    out_dir: PathBuf,
    size: (u32, u32),
}

impl SvgRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(200), height.max(150));
        self
    }

    pub fn path_for(&self, surface: &str) -> PathBuf {
        self.out_dir.join(format!("{}.svg", file_stem(surface)))
    }
}

impl ChartRenderer for SvgRenderer {
    type Handle = SvgChart;

    fn render(&self, chart: &ChartSpec) -> Result<SvgChart, AppError> {
        let path = self.path_for(&chart.surface);
        draw_to_file(&path, self.size, chart)
            .map_err(|e| AppError::new(4, format!("Failed to draw chart '{}': {e}", chart.surface)))?;

        Ok(SvgChart {
            surface: chart.surface.clone(),
            path,
        })
    }
}

fn draw_to_file(path: &Path, size: (u32, u32), chart: &ChartSpec) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(&chart.options.title, ("sans-serif", 22))?;

    match &chart.data {
        ChartData::Series(combined) => draw_series(&area, chart.kind, combined, &chart.options)?,
        ChartData::Pie(pie) => draw_pie(&area, pie)?,
    }

    root.present()
}

fn draw_series(
    area: &SvgArea<'_>,
    kind: ChartKind,
    combined: &CombinedChartData,
    options: &ChartOptions,
) -> DrawResult {
    let n = combined.labels.len();
    let (y_min, y_max) = value_range(combined, options.begin_at_zero);
    let x_range = -0.5..(n.max(1) as f64 - 0.5);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_min..y_max)?;

    let labels = &combined.labels;
    let label_at = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    };
    let fmt_y = |v: &f64| format!("{v:.1}");

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_labels(n.clamp(1, 12))
        .x_label_formatter(&label_at)
        .y_label_formatter(&fmt_y);
    if let Some(title) = &options.x_title {
        mesh.x_desc(title.as_str());
    }
    if let Some(title) = &options.y_title {
        mesh.y_desc(title.as_str());
    }
    mesh.draw()?;

    let slot = 0.8 / combined.datasets.len().max(1) as f64;
    for (j, ds) in combined.datasets.iter().enumerate() {
        let fill = color_or_fallback(&ds.background_color, j);
        let border = color_or_fallback(&ds.border_color, j);
        let points: Vec<(f64, f64)> = ds.data.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();

        let anno = match kind {
            ChartKind::Bar | ChartKind::Pie => chart.draw_series(points.iter().map(|&(x, v)| {
                let x0 = x - 0.4 + j as f64 * slot;
                Rectangle::new([(x0, 0.0), (x0 + slot, v)], fill.filled())
            }))?,
            ChartKind::Line => chart.draw_series(LineSeries::new(points, border.stroke_width(2)))?,
            ChartKind::Area => chart.draw_series(
                AreaSeries::new(points, 0.0, fill.filled()).border_style(border.stroke_width(2)),
            )?,
        };
        anno.label(ds.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }

    if !combined.datasets.is_empty() {
        chart
            .configure_series_labels()
            .position(legend_position(options.legend))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .draw()?;
    }

    Ok(())
}

fn draw_pie(area: &SvgArea<'_>, pie: &PieData) -> DrawResult {
    let (w, h) = area.dim_in_pixel();
    let legend_h = 30;
    let center = (w as i32 / 2, legend_h + (h as i32 - legend_h) / 2);
    let radius = ((w.min(h) as i32 - legend_h) / 2 - 10).max(10);

    let color_at = |i: usize| color_or_fallback(pie.colors.get(i).map(String::as_str).unwrap_or(""), i);

    let font = ("sans-serif", 14).into_font();
    let mut x = 10;
    for (i, label) in pie.labels.iter().enumerate() {
        area.draw(&Rectangle::new([(x, 8), (x + 14, 22)], color_at(i).filled()))?;
        area.draw(&Text::new(label.as_str(), (x + 18, 8), font.clone()))?;
        x += 18 + label.chars().count() as i32 * 8 + 16;
    }

    let total: f64 = pie.values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
    if total <= 0.0 {
        area.draw(&Circle::new(center, radius, BLACK.mix(0.3)))?;
        return Ok(());
    }

    let r = radius as f64;
    let mut start = -FRAC_PI_2;
    for (i, &value) in pie.values.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            continue;
        }
        let sweep = value / total * TAU;
        let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;

        let mut wedge = vec![center];
        for s in 0..=steps {
            let a = start + sweep * s as f64 / steps as f64;
            wedge.push((
                center.0 + (r * a.cos()).round() as i32,
                center.1 + (r * a.sin()).round() as i32,
            ));
        }
        area.draw(&Polygon::new(wedge, color_at(i).filled()))?;
        start += sweep;
    }

    Ok(())
}

/// Y bounds for the combined data, padded slightly above.
fn value_range(combined: &CombinedChartData, begin_at_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = combined
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if begin_at_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if hi - lo < 1e-12 {
        hi = lo + 1.0;
    }

    let pad = (hi - lo) * 0.05;
    (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
}

fn legend_position(legend: LegendPosition) -> SeriesLabelPosition {
    match legend {
        LegendPosition::Top => SeriesLabelPosition::UpperMiddle,
        LegendPosition::Bottom => SeriesLabelPosition::LowerMiddle,
        LegendPosition::Left => SeriesLabelPosition::MiddleLeft,
        LegendPosition::Right => SeriesLabelPosition::MiddleRight,
    }
}

/// Surface id reduced to a safe file name.
pub fn file_stem(surface: &str) -> String {
    surface
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
