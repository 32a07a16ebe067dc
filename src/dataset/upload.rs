//! Upload validation and shaping
//!
//! Turns the bytes of an uploaded CSV into a [`SalesTable`]. The only
//! structural requirement is a header containing `date` and `sales`; any
//! other columns are carried along for the preview and otherwise ignored.

use super::error::{DatasetError, DatasetResult};
use super::types::{SalesRow, SalesTable, DATE_COLUMN, SALES_COLUMN};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;

/// Date/time layouts tried, in order, after RFC 3339
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, coerced to midnight
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%Y%m%d",
];

/// Cells read as a missing sales value, matching the usual CSV NA markers
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse a date cell into a date/time
///
/// Returns `None` when no known layout matches. Timezone-aware values are
/// converted to UTC and the offset dropped.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a sales cell
///
/// Empty cells and NA markers are missing values. Infinite values are
/// rejected along with non-numeric text.
fn parse_sales(text: &str) -> Result<Option<f64>, ()> {
    let text = text.trim();
    if MISSING_TOKENS.contains(&text) {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(()),
    }
}

/// Reject uploads larger than `limit` bytes
pub fn check_size(size: usize, limit: usize) -> DatasetResult<()> {
    if size > limit {
        return Err(DatasetError::TooLarge { size, limit });
    }
    Ok(())
}

/// Validate and shape an uploaded CSV
///
/// Fails with [`DatasetError::MissingColumns`] before looking at any data
/// row when either required column is absent.
pub fn parse_upload(bytes: &[u8]) -> DatasetResult<SalesTable> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DatasetError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(DatasetError::Empty);
    }

    let date_index = headers.iter().position(|h| h == DATE_COLUMN);
    let sales_index = headers.iter().position(|h| h == SALES_COLUMN);

    let (date_index, sales_index) = match (date_index, sales_index) {
        (Some(d), Some(s)) => (d, s),
        (d, s) => {
            let mut missing = Vec::new();
            if d.is_none() {
                missing.push(DATE_COLUMN.to_string());
            }
            if s.is_none() {
                missing.push(SALES_COLUMN.to_string());
            }
            tracing::warn!(?missing, columns = ?headers, "Upload rejected: missing required columns");
            return Err(DatasetError::MissingColumns { missing });
        }
    };

    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);

        // Short rows read as empty cells
        let cells: Vec<String> = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();

        let date_text = &cells[date_index];
        let date = parse_date(date_text).ok_or_else(|| DatasetError::InvalidDate {
            line,
            value: date_text.clone(),
        })?;

        let sales_text = &cells[sales_index];
        let sales = parse_sales(sales_text).map_err(|_| DatasetError::InvalidSales {
            line,
            value: sales_text.clone(),
        })?;

        rows.push(SalesRow { date, sales, cells });
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    let table = SalesTable::new(headers, rows, date_index, sales_index);

    tracing::debug!(
        rows = table.len(),
        columns = table.headers().len(),
        "Upload validated"
    );

    Ok(table)
}

/// Validate and shape a CSV file on disk
pub fn parse_upload_file(path: &Path) -> DatasetResult<SalesTable> {
    let bytes = std::fs::read(path)?;
    parse_upload(&bytes)
}
