//! The dashboard shipped with the binary: the solar/renewables pages.
//!
//! Paths are kept exactly as the pages reference them, including the
//! extension-less geothermal file in the line chart. That one resolves to a
//! missing file and renders as a zero series.

use crate::config::{ChartConfig, DashboardConfig, SeriesConfig};
use crate::domain::{AggregationMode, ChartKind, LegendPosition, RowFilter, YearFilter};

pub const DEFAULT_DATA_ROOT: &str = "../../PUBLICO/DATES";

const FILTER_COUNTRY: &str = "Colombia";
const FILTER_YEAR: i32 = 2021;

const TEAL: &str = "rgba(75, 192, 192, 0.5)";
const YELLOW: &str = "rgba(255, 206, 86, 0.5)";
const BLUE: &str = "rgba(54, 162, 235, 0.5)";
const PURPLE: &str = "rgba(153, 102, 255, 0.5)";
const RED: &str = "rgba(255, 99, 132, 0.5)";

fn series(path: &str, label: &str, color: &str) -> SeriesConfig {
    SeriesConfig {
        path: path.to_string(),
        label: label.to_string(),
        color: color.to_string(),
        border_color: None,
        filter: None,
    }
}

pub fn builtin_dashboard() -> DashboardConfig {
    let country_year = RowFilter::new(FILTER_COUNTRY, YearFilter::Exact(FILTER_YEAR), AggregationMode::Sum);

    let bar = ChartConfig {
        surface: "graficabarras".to_string(),
        kind: ChartKind::Bar,
        title: format!("Comparación de Consumo y Producción de Energías - {FILTER_COUNTRY} ({FILTER_YEAR})"),
        x_title: None,
        y_title: None,
        legend: LegendPosition::Top,
        tension: None,
        filter: country_year.clone(),
        series: vec![
            series("08 wind-generation.csv", "Generación Eólica", TEAL),
            series("12 solar-energy-consumption.csv", "Consumo Solar", YELLOW),
            series("05 hydropower-consumption.csv", "Consumo Hidroeléctrico", BLUE),
            series("16 biofuel-production.csv", "Producción de Biocombustible", PURPLE),
            series("17 installed-geothermal-capacity.csv", "Capacidad Geotérmica", RED),
        ],
    };

    let pie = ChartConfig {
        surface: "graficoTorta".to_string(),
        kind: ChartKind::Pie,
        title: format!("Distribución de Energías en {FILTER_COUNTRY} ({FILTER_YEAR})"),
        x_title: None,
        y_title: None,
        legend: LegendPosition::Top,
        tension: None,
        filter: country_year,
        series: vec![
            series("04 share-electricity-renewables.csv", "Electricidad Renovable", TEAL),
            series("11 share-electricity-wind.csv", "Electricidad Eólica", YELLOW),
            series("15 share-electricity-solar.csv", "Electricidad Solar", BLUE),
            series("07 share-electricity-hydro.csv", "Electricidad Hidroeléctrica", PURPLE),
        ],
    };

    let lines = ChartConfig {
        surface: "graficoLineas".to_string(),
        kind: ChartKind::Line,
        title: "Tendencia de Energías en China".to_string(),
        x_title: Some("Años".to_string()),
        y_title: Some("Producción/Consumo".to_string()),
        legend: LegendPosition::Top,
        tension: Some(0.4),
        filter: RowFilter::new("China", YearFilter::Any, AggregationMode::Sum),
        series: vec![
            series(
                "09 cumulative-installed-wind-energy-capacity-gigawatts.csv",
                "Generación Eólica",
                TEAL,
            ),
            series("13 installed-solar-PV-capacity.csv", "Consumo Solar", YELLOW),
            series("17 installed-geothermal-capacity", "Consumo Hidroeléctrico", BLUE),
        ],
    };

    let area = ChartConfig {
        surface: "graficoArea".to_string(),
        kind: ChartKind::Area,
        title: "Consumo de Energía Renovable Moderna en Colombia".to_string(),
        x_title: Some("Años".to_string()),
        y_title: Some("Consumo (TWh)".to_string()),
        legend: LegendPosition::Top,
        tension: Some(0.4),
        filter: RowFilter::new(
            FILTER_COUNTRY,
            YearFilter::Range { min: 2000, max: 2022 },
            AggregationMode::Overwrite,
        ),
        series: vec![SeriesConfig {
            border_color: Some("rgba(54, 162, 235, 1)".to_string()),
            ..series(
                "02 modern-renewable-energy-consumption.csv",
                "Consumo de Energía Renovable Moderna (Colombia)",
                BLUE,
            )
        }],
    };

    DashboardConfig {
        data_root: DEFAULT_DATA_ROOT.to_string(),
        charts: vec![bar, pie, lines, area],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dashboard_is_valid() {
        let config = builtin_dashboard();
        config.validate().unwrap();

        let kinds: Vec<ChartKind> = config.charts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie, ChartKind::Line, ChartKind::Area]);
    }

    #[test]
    fn line_chart_keeps_the_extensionless_geothermal_path() {
        let config = builtin_dashboard();
        let lines = config.chart("graficoLineas").unwrap();
        assert!(lines.series.iter().any(|s| s.path == "17 installed-geothermal-capacity"));

        let bar = config.chart("graficabarras").unwrap();
        assert!(bar.series.iter().any(|s| s.path == "17 installed-geothermal-capacity.csv"));
    }
}
