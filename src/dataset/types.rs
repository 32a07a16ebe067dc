//! Core data types for uploaded sales data
//!
//! - `SalesTable`: the uploaded table, validated and sorted by date
//! - `SalesRow`: one row of that table
//! - `History`: the same data renamed to the `ds`/`y` shape a forecaster expects

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Name of the required date column
pub const DATE_COLUMN: &str = "date";

/// Name of the required sales column
pub const SALES_COLUMN: &str = "sales";

/// One row of an uploaded table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalesRow {
    /// Coerced value of the `date` column
    pub date: NaiveDateTime,
    /// Value of the `sales` column, `None` when the cell is empty
    pub sales: Option<f64>,
    /// Raw text of every cell, in header order
    pub cells: Vec<String>,
}

/// An uploaded table that passed validation
///
/// Rows are always sorted ascending by date. The sort is stable, so rows
/// sharing a date keep their upload order.
#[derive(Debug, Clone, Serialize)]
pub struct SalesTable {
    headers: Vec<String>,
    rows: Vec<SalesRow>,
    date_index: usize,
    sales_index: usize,
}

impl SalesTable {
    /// Build a table, sorting the rows by date
    pub fn new(
        headers: Vec<String>,
        mut rows: Vec<SalesRow>,
        date_index: usize,
        sales_index: usize,
    ) -> Self {
        rows.sort_by_key(|row| row.date);
        Self {
            headers,
            rows,
            date_index,
            sales_index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the `date` column in the header
    pub fn date_index(&self) -> usize {
        self.date_index
    }

    /// Position of the `sales` column in the header
    pub fn sales_index(&self) -> usize {
        self.sales_index
    }

    /// First `n` rows (the preview)
    pub fn head(&self, n: usize) -> &[SalesRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Display cells for the first `n` rows
    ///
    /// The date column shows the coerced value rather than the raw upload text.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.head(n)
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        if idx == self.date_index {
                            format_timestamp(&row.date)
                        } else {
                            cell.clone()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Rename `date`/`sales` to `ds`/`y`, dropping every other column
    pub fn to_history(&self) -> History {
        History::new(
            self.rows
                .iter()
                .map(|row| Observation {
                    ds: row.date,
                    y: row.sales,
                })
                .collect(),
        )
    }
}

/// A single observation in forecaster shape
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Observation {
    pub ds: NaiveDateTime,
    pub y: Option<f64>,
}

/// Historical observations, sorted ascending by `ds`
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    observations: Vec<Observation>,
}

impl History {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.ds);
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDateTime> {
        self.observations.first().map(|o| o.ds)
    }

    pub fn last_date(&self) -> Option<NaiveDateTime> {
        self.observations.last().map(|o| o.ds)
    }

    /// Distinct dates in ascending order
    pub fn unique_dates(&self) -> Vec<NaiveDateTime> {
        let mut dates: Vec<NaiveDateTime> = self.observations.iter().map(|o| o.ds).collect();
        dates.dedup();
        dates
    }

    /// Observations that carry a value, as `(ds, y)` pairs
    pub fn observed(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.observations
            .iter()
            .filter_map(|o| o.y.map(|y| (o.ds, y)))
    }

    /// Number of observations that carry a value
    pub fn observed_count(&self) -> usize {
        self.observed().count()
    }
}

/// Format a timestamp for display, omitting the time when it is midnight
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
