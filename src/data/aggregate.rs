//! Row filtering and per-year aggregation.
//!
//! Rows are positional (`entity,code,year,value`) and are never validated
//! beyond what the filter needs. A row that fails to parse is skipped and
//! recorded; it never aborts the aggregate.

use log::{debug, warn};

use crate::data::numeric::{leading_float, leading_int};
use crate::domain::{CsvRow, RowFilter, YearlyAggregate};
use crate::error::{FetchError, RowSkip};
use crate::io::fetch::{Fetcher, split_rows};

/// A skipped row with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: RowSkip,
}

/// Aggregate plus bookkeeping about how it was produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateReport {
    pub aggregate: YearlyAggregate,
    pub rows_read: usize,
    pub rows_used: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Split one line into its positional fields.
pub fn parse_row(line: &str) -> CsvRow<'_> {
    let mut fields = line.split(',');
    CsvRow {
        entity: fields.next().unwrap_or(""),
        code: fields.next(),
        year: fields.next(),
        value: fields.next(),
    }
}

/// Decide whether a row contributes, and with what.
///
/// - `Ok(None)`: filtered out (wrong entity or year outside the filter)
/// - `Ok(Some((year, value)))`: contributes
/// - `Err(_)`: matched the entity but a field failed to parse
///
/// Year and value are read by their leading numeric prefix; the year text is
/// kept verbatim as the aggregate key.
pub fn row_contribution<'a>(row: &CsvRow<'a>, filter: &RowFilter) -> Result<Option<(&'a str, f64)>, RowSkip> {
    if row.entity != filter.entity {
        return Ok(None);
    }

    let year_text = row.year.filter(|s| !s.is_empty()).ok_or(RowSkip::MissingField("year"))?;
    let year = leading_int(year_text).ok_or_else(|| RowSkip::InvalidYear(year_text.to_string()))?;

    if !filter.years.accepts(year) {
        return Ok(None);
    }

    let value_text = row.value.filter(|s| !s.is_empty()).ok_or(RowSkip::MissingField("value"))?;
    let value = leading_float(value_text).ok_or_else(|| RowSkip::InvalidValue(value_text.to_string()))?;

    Ok(Some((year_text, value)))
}

/// Aggregate data rows (header already removed) into a report.
pub fn aggregate_report<S: AsRef<str>>(rows: &[S], filter: &RowFilter) -> AggregateReport {
    let mut report = AggregateReport::default();

    for (idx, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        report.rows_read += 1;

        match row_contribution(&parse_row(line), filter) {
            Ok(Some((year, value))) => {
                report.aggregate.record(year, value, filter.mode);
                report.rows_used += 1;
            }
            Ok(None) => {}
            Err(reason) => report.skipped.push(SkippedRow {
                // +2: rows start after the header, lines are 1-based.
                line: idx + 2,
                reason,
            }),
        }
    }

    report
}

/// Aggregate data rows, discarding the bookkeeping.
pub fn aggregate_rows<S: AsRef<str>>(rows: &[S], filter: &RowFilter) -> YearlyAggregate {
    aggregate_report(rows, filter).aggregate
}

/// Fetch `path` and aggregate it. Fetch failures are returned, not hidden.
pub fn load_aggregate(fetcher: &dyn Fetcher, path: &str, filter: &RowFilter) -> Result<AggregateReport, FetchError> {
    let text = fetcher.fetch_text(path)?;
    let rows = split_rows(&text);
    let report = aggregate_report(&rows, filter);

    debug!(
        "{path}: {} rows read, {} used, {} skipped, {} years for '{}'",
        report.rows_read,
        report.rows_used,
        report.skipped.len(),
        report.aggregate.len(),
        filter.entity
    );

    Ok(report)
}

/// Best-effort boundary: a failed fetch becomes an empty aggregate.
pub fn aggregate_or_empty(fetcher: &dyn Fetcher, path: &str, filter: &RowFilter) -> YearlyAggregate {
    match load_aggregate(fetcher, path, filter) {
        Ok(report) => report.aggregate,
        Err(err) => {
            warn!("Error processing {path}: {err}");
            YearlyAggregate::new()
        }
    }
}
