//! Uploaded Sales Data
//!
//! Validation and shaping of the uploaded table:
//!
//! - **types**: `SalesTable`, `SalesRow`, `History`
//! - **upload**: CSV parsing, required-column check, date coercion
//! - **error**: Error types
//!
//! # Flow
//!
//! ```text
//! CSV bytes → header check (date, sales) → coerce dates → sort → SalesTable
//! SalesTable → rename (date→ds, sales→y) → History
//! ```
//!
//! # Example
//!
//! ```rust
//! use salescast::dataset::parse_upload;
//!
//! let table = parse_upload(b"date,sales\n2024-01-02,5\n2024-01-01,4\n").unwrap();
//! let history = table.to_history();
//! assert_eq!(history.observed_count(), 2);
//! ```

pub mod error;
pub mod types;
pub mod upload;

pub use error::{DatasetError, DatasetResult};
pub use types::{
    format_timestamp, History, Observation, SalesRow, SalesTable, DATE_COLUMN, SALES_COLUMN,
};
pub use upload::{check_size, parse_date, parse_upload, parse_upload_file};
