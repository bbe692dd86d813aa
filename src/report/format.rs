//! Formatted terminal output for aggregates and dashboard runs.
//!
//! Formatting lives here so the data and rendering code stay free of
//! presentation concerns.

use std::path::PathBuf;

use crate::data::AggregateReport;
use crate::data::combine::compare_years;
use crate::domain::{ChartData, ChartSpec, RowFilter, YearFilter};

/// What a dashboard run wrote to disk.
#[derive(Debug, Clone, Default)]
pub struct DashboardOutputs {
    pub html: Option<PathBuf>,
    pub svgs: Vec<PathBuf>,
    pub exports: Vec<PathBuf>,
}

/// Header, year table and skipped-row notes for `energy aggregate`.
pub fn format_aggregate_report(path: &str, filter: &RowFilter, report: &AggregateReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {path} ===\n"));
    out.push_str(&format!(
        "Entity: {} | years: {} | mode: {:?}\n",
        filter.entity,
        describe_years(&filter.years),
        filter.mode
    ));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n\n",
        report.rows_read,
        report.rows_used,
        report.skipped.len()
    ));

    if report.aggregate.is_empty() {
        out.push_str("(no matching rows)\n");
    } else {
        out.push_str(&format!("{:<8} {:>16}\n", "year", "value"));
        out.push_str(&format!("{:-<8} {:-<16}\n", "", ""));

        let mut entries: Vec<(&str, f64)> = report.aggregate.iter().collect();
        entries.sort_by(|a, b| compare_years(a.0, b.0));
        for (year, value) in entries {
            out.push_str(&format!("{:<8} {:>16}\n", truncate(year, 8), fmt_value(value)));
        }
        out.push_str(&format!("{:<8} {:>16}\n", "total", fmt_value(report.aggregate.total())));
    }

    if !report.skipped.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for skip in &report.skipped {
            out.push_str(&format!("  line {}: {}\n", skip.line, skip.reason));
        }
    }

    out
}

/// One line per chart plus the written files.
pub fn format_dashboard_summary(charts: &[ChartSpec], outputs: &DashboardOutputs) -> String {
    let mut out = String::new();

    out.push_str("=== energy dashboard ===\n");
    out.push_str(
        format!("{:<16} {:<6} {:>7} {:>8}  {}\n", "surface", "kind", "series", "labels", "title").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<6} {:-<7} {:-<8}  {:-<5}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for chart in charts {
        let (series, labels) = match &chart.data {
            ChartData::Series(combined) => (combined.datasets.len(), combined.labels.len()),
            ChartData::Pie(pie) => (pie.values.len(), pie.labels.len()),
        };
        out.push_str(&format!(
            "{:<16} {:<6} {:>7} {:>8}  {}\n",
            truncate(&chart.surface, 16),
            chart.kind.display_name(),
            series,
            labels,
            chart.options.title
        ));
    }

    if let Some(path) = &outputs.html {
        out.push_str(&format!("\nHTML: {}\n", path.display()));
    }
    if !outputs.svgs.is_empty() {
        out.push_str(&format!("\nSVG ({}):\n", outputs.svgs.len()));
        for path in &outputs.svgs {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    if !outputs.exports.is_empty() {
        out.push_str(&format!("\nExports ({}):\n", outputs.exports.len()));
        for path in &outputs.exports {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }

    out
}

fn describe_years(years: &YearFilter) -> String {
    match years {
        YearFilter::Any => "any".to_string(),
        YearFilter::Exact(year) => year.to_string(),
        YearFilter::Range { min, max } => format!("{min}..={max}"),
    }
}

fn fmt_value(v: f64) -> String {
    format!("{v:.3}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SkippedRow;
    use crate::domain::{AggregationMode, ChartKind, ChartOptions, PieData, YearlyAggregate};
    use crate::error::RowSkip;

    #[test]
    fn aggregate_report_lists_years_numerically() {
        let filter = RowFilter::new("Colombia", YearFilter::Range { min: 2000, max: 2022 }, AggregationMode::Sum);
        let report = AggregateReport {
            aggregate: [("2010", 2.0), ("2009", 1.5)].into_iter().collect::<YearlyAggregate>(),
            rows_read: 4,
            rows_used: 2,
            skipped: vec![SkippedRow {
                line: 3,
                reason: RowSkip::InvalidValue("n/a".to_string()),
            }],
        };

        let text = format_aggregate_report("08 wind-generation.csv", &filter, &report);
        assert!(text.contains("Entity: Colombia | years: 2000..=2022 | mode: Sum"));
        assert!(text.contains("Rows: read=4 used=2 skipped=1"));

        let y2009 = text.find("2009").unwrap();
        let y2010 = text.find("2010").unwrap();
        assert!(y2009 < y2010);
        assert!(text.contains("total"));
        assert!(text.contains("3.500"));
        assert!(text.contains("line 3: value 'n/a' does not start with a number"));
    }

    #[test]
    fn empty_aggregate_says_so() {
        let filter = RowFilter::new("Atlantis", YearFilter::Any, AggregationMode::Sum);
        let text = format_aggregate_report("x.csv", &filter, &AggregateReport::default());
        assert!(text.contains("(no matching rows)"));
        assert!(!text.contains("Skipped rows"));
    }

    #[test]
    fn dashboard_summary_counts_series() {
        let charts = vec![ChartSpec {
            surface: "graficoTorta".to_string(),
            kind: ChartKind::Pie,
            data: ChartData::Pie(PieData {
                labels: vec!["A".to_string(), "B".to_string()],
                values: vec![1.0, 2.0],
                colors: vec![String::new(), String::new()],
            }),
            options: ChartOptions::titled("Distribución"),
        }];
        let outputs = DashboardOutputs {
            html: Some(PathBuf::from("dashboard/index.html")),
            ..Default::default()
        };

        let text = format_dashboard_summary(&charts, &outputs);
        assert!(text.contains("graficoTorta"));
        assert!(text.contains("pie"));
        assert!(text.contains("Distribución"));
        assert!(text.contains("HTML: dashboard/index.html"));
        assert!(!text.contains("SVG"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("graficabarras", 16), "graficabarras");
        assert_eq!(truncate("averyveryverylongsurface", 8), "averyve.");
    }
}
