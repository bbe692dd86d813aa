//! Export aggregates and chart data to CSV/JSON.
//!
//! Exports are meant for spreadsheets and for checking what a chart was
//! actually fed.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::data::combine::compare_years;
use crate::domain::{CombinedChartData, PieData, YearlyAggregate};
use crate::error::AppError;

fn csv_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn csv_err(path: &Path) -> impl Fn(csv::Error) -> AppError + '_ {
    move |e| AppError::new(4, format!("Failed to write export CSV '{}': {e}", path.display()))
}

/// `year,value`, years in numeric order.
pub fn write_aggregate_csv(path: &Path, aggregate: &YearlyAggregate) -> Result<(), AppError> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["year", "value"]).map_err(csv_err(path))?;

    let mut entries: Vec<(&str, f64)> = aggregate.iter().collect();
    entries.sort_by(|a, b| compare_years(a.0, b.0));
    for (year, value) in entries {
        writer
            .write_record([year.to_string(), value.to_string()])
            .map_err(csv_err(path))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV '{}': {e}", path.display())))
}

/// `year,<series 1>,<series 2>,…` with one row per label.
pub fn write_combined_csv(path: &Path, combined: &CombinedChartData) -> Result<(), AppError> {
    let mut writer = csv_writer(path)?;

    let mut header = vec!["year".to_string()];
    header.extend(combined.datasets.iter().map(|d| d.label.clone()));
    writer.write_record(&header).map_err(csv_err(path))?;

    for (i, label) in combined.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(
            combined
                .datasets
                .iter()
                .map(|d| d.data.get(i).copied().unwrap_or(0.0).to_string()),
        );
        writer.write_record(&row).map_err(csv_err(path))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV '{}': {e}", path.display())))
}

/// `label,value,color` for pie charts.
pub fn write_pie_csv(path: &Path, pie: &PieData) -> Result<(), AppError> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["label", "value", "color"]).map_err(csv_err(path))?;

    for (i, label) in pie.labels.iter().enumerate() {
        let value = pie.values.get(i).copied().unwrap_or(0.0).to_string();
        let color = pie.colors.get(i).map(String::as_str).unwrap_or("");
        writer
            .write_record([label.as_str(), value.as_str(), color])
            .map_err(csv_err(path))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV '{}': {e}", path.display())))
}

/// Pretty JSON for any serializable value.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;

    #[test]
    fn aggregate_csv_is_numerically_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agg.csv");
        let agg: YearlyAggregate = [("10", 1.5), ("2", 2.0)].into_iter().collect();
        write_aggregate_csv(&path, &agg).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "year,value\n2,2\n10,1.5\n");
    }

    #[test]
    fn combined_csv_has_one_column_per_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.csv");
        let combined = CombinedChartData {
            labels: vec!["2000".to_string(), "2001".to_string()],
            datasets: vec![
                Dataset {
                    label: "A".to_string(),
                    background_color: "red".to_string(),
                    border_color: "red".to_string(),
                    data: vec![1.0, 2.0],
                },
                Dataset {
                    label: "B".to_string(),
                    background_color: "blue".to_string(),
                    border_color: "blue".to_string(),
                    data: vec![0.0, 5.5],
                },
            ],
        };
        write_combined_csv(&path, &combined).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "year,A,B\n2000,1,0\n2001,2,5.5\n");
    }

    #[test]
    fn pie_csv_quotes_css_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.csv");
        let pie = PieData {
            labels: vec!["Solar".to_string()],
            values: vec![3.25],
            colors: vec!["rgba(54, 162, 235, 0.5)".to_string()],
        };
        write_pie_csv(&path, &pie).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "label,value,color\nSolar,3.25,\"rgba(54, 162, 235, 0.5)\"\n");
    }
}
