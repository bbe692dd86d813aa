//! Shared "chart build" logic used by every front-end.
//!
//! One chart: fetch each series -> aggregate -> combine -> `ChartSpec`.
//! A dashboard builds its charts concurrently on the rayon pool; within a
//! chart the series files are fetched in parallel and joined in
//! configuration order before combining.

use log::{debug, info};
use rayon::prelude::*;

use crate::config::{ChartConfig, DashboardConfig};
use crate::data::{aggregate_or_empty, combine, pie_from_series};
use crate::domain::{ChartData, ChartKind, ChartSpec, SeriesSpec, YearlyAggregate};
use crate::error::AppError;
use crate::io::fetch::Fetcher;
use crate::render::{ChartRenderer, SurfaceRegistry};

/// Resolve every series to its aggregate, keeping input order.
///
/// Never fails: a series whose file cannot be fetched gets an empty
/// aggregate.
pub fn load_series(fetcher: &dyn Fetcher, specs: &[SeriesSpec]) -> Vec<(SeriesSpec, YearlyAggregate)> {
    specs
        .par_iter()
        .map(|spec| {
            let aggregate = aggregate_or_empty(fetcher, &spec.path, &spec.filter);
            debug!("Data for {}: {} year(s)", spec.label, aggregate.len());
            (spec.clone(), aggregate)
        })
        .collect()
}

/// Build the renderer input for one configured chart.
pub fn build_chart(fetcher: &dyn Fetcher, chart: &ChartConfig) -> ChartSpec {
    let series = load_series(fetcher, &chart.series_specs());

    let data = match chart.kind {
        ChartKind::Pie => ChartData::Pie(pie_from_series(&series)),
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => ChartData::Series(combine(&series)),
    };

    ChartSpec {
        surface: chart.surface.clone(),
        kind: chart.kind,
        data,
        options: chart.options(),
    }
}

/// Build every chart of a dashboard, in configuration order.
pub fn build_dashboard(fetcher: &dyn Fetcher, config: &DashboardConfig) -> Vec<ChartSpec> {
    config
        .charts
        .par_iter()
        .map(|chart| build_chart(fetcher, chart))
        .collect()
}

/// Bind already-built charts to their surfaces through `registry`.
///
/// The first render failure is returned as the error; other surfaces may
/// still have been rendered.
pub fn render_specs<R>(
    charts: &[ChartSpec],
    renderer: &R,
    registry: &SurfaceRegistry<R::Handle>,
) -> Result<(), AppError>
where
    R: ChartRenderer,
{
    charts.par_iter().try_for_each(|spec| {
        registry.replace(renderer, spec)?;
        info!("Rendered {} chart on '{}'", spec.kind.display_name(), spec.surface);
        Ok(())
    })
}

/// Build every chart and bind it to its surface through `registry`.
///
/// Returns the built charts in configuration order.
pub fn render_dashboard<R>(
    fetcher: &dyn Fetcher,
    config: &DashboardConfig,
    renderer: &R,
    registry: &SurfaceRegistry<R::Handle>,
) -> Result<Vec<ChartSpec>, AppError>
where
    R: ChartRenderer,
{
    let charts = build_dashboard(fetcher, config);
    render_specs(&charts, renderer, registry)?;
    Ok(charts)
}
