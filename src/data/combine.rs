//! Merge independently-sourced aggregates onto one year axis.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::{CombinedChartData, Dataset, PieData, SeriesSpec, YearlyAggregate};

/// Compare year labels numerically ("2" < "10").
///
/// Labels that are not integers sort after every numeric label, in string
/// order among themselves.
pub fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Sorted union of every year present in any aggregate.
pub fn union_years<'a, I>(aggregates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a YearlyAggregate>,
{
    let set: BTreeSet<&str> = aggregates.into_iter().flat_map(|agg| agg.years()).collect();
    let mut labels: Vec<String> = set.into_iter().map(str::to_string).collect();
    labels.sort_by(|a, b| compare_years(a, b));
    labels
}

/// Build the label axis and one zero-filled dataset per series.
///
/// `series` is in display order; the same order is kept for the datasets.
pub fn combine(series: &[(SeriesSpec, YearlyAggregate)]) -> CombinedChartData {
    let labels = union_years(series.iter().map(|(_, agg)| agg));

    let datasets = series
        .iter()
        .map(|(spec, agg)| Dataset {
            label: spec.label.clone(),
            background_color: spec.color.clone(),
            border_color: spec.border().to_string(),
            data: labels.iter().map(|year| agg.get(year).unwrap_or(0.0)).collect(),
        })
        .collect();

    CombinedChartData { labels, datasets }
}

/// Collapse each series to the sum of its aggregate.
pub fn pie_from_series(series: &[(SeriesSpec, YearlyAggregate)]) -> PieData {
    let mut pie = PieData::default();
    for (spec, agg) in series {
        pie.labels.push(spec.label.clone());
        pie.values.push(agg.total());
        pie.colors.push(spec.color.clone());
    }
    pie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregationMode, RowFilter, YearFilter};

    fn spec(label: &str, color: &str) -> SeriesSpec {
        SeriesSpec {
            path: format!("{label}.csv"),
            label: label.to_string(),
            color: color.to_string(),
            border_color: None,
            filter: RowFilter::new("China", YearFilter::Any, AggregationMode::Sum),
        }
    }

    fn agg(entries: &[(&str, f64)]) -> YearlyAggregate {
        entries.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn labels_sort_numerically() {
        let a = agg(&[("2", 1.0), ("10", 1.0), ("1", 1.0)]);
        assert_eq!(union_years([&a]), vec!["1", "2", "10"]);
    }

    #[test]
    fn non_numeric_labels_sort_last() {
        assert_eq!(compare_years("abc", "1999"), Ordering::Greater);
        assert_eq!(compare_years("1999", "abc"), Ordering::Less);
        assert_eq!(compare_years("a", "b"), Ordering::Less);
    }

    #[test]
    fn missing_years_are_zero_filled() {
        let a = agg(&[("2000", 1.0), ("2001", 2.0)]);
        let b = agg(&[("2001", 5.0)]);
        let combined = combine(&[(spec("A", "red"), a), (spec("B", "blue"), b)]);

        assert_eq!(combined.labels, vec!["2000", "2001"]);
        assert_eq!(combined.datasets[0].data, vec![1.0, 2.0]);
        assert_eq!(combined.datasets[1].data, vec![0.0, 5.0]);
        for ds in &combined.datasets {
            assert_eq!(ds.data.len(), combined.labels.len());
        }
    }

    #[test]
    fn metadata_is_carried_through() {
        let mut area = spec("Moderna", "rgba(54, 162, 235, 0.5)");
        area.border_color = Some("rgba(54, 162, 235, 1)".to_string());
        let combined = combine(&[(spec("A", "red"), agg(&[])), (area, agg(&[("2000", 1.0)]))]);

        assert_eq!(combined.datasets[0].label, "A");
        assert_eq!(combined.datasets[0].background_color, "red");
        assert_eq!(combined.datasets[0].border_color, "red");
        assert_eq!(combined.datasets[1].background_color, "rgba(54, 162, 235, 0.5)");
        assert_eq!(combined.datasets[1].border_color, "rgba(54, 162, 235, 1)");
    }

    #[test]
    fn empty_series_yield_zero_filled_data() {
        let combined = combine(&[(spec("A", "red"), agg(&[])), (spec("B", "blue"), agg(&[]))]);
        assert!(combined.labels.is_empty());
        assert_eq!(combined.datasets.len(), 2);
        assert!(combined.datasets.iter().all(|d| d.data.is_empty()));

        let nothing = combine(&[]);
        assert_eq!(nothing, CombinedChartData::default());
    }

    #[test]
    fn pie_sums_each_series() {
        let pie = pie_from_series(&[
            (spec("Wind", "w"), agg(&[("2021", 1.5), ("2020", 2.0)])),
            (spec("Solar", "s"), agg(&[])),
        ]);
        assert_eq!(pie.labels, vec!["Wind", "Solar"]);
        assert_eq!(pie.values, vec![3.5, 0.0]);
        assert_eq!(pie.colors, vec!["w", "s"]);
    }
}
