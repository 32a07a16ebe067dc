//! Dataset error types
//!
//! Everything that can go wrong between receiving an upload and handing
//! the shaped history to a forecaster.

use thiserror::Error;

/// Errors raised while validating and shaping an uploaded table
#[derive(Error, Debug)]
pub enum DatasetError {
    /// One or both of the required columns is absent from the header
    #[error("CSV must contain 'date' and 'sales' columns.")]
    MissingColumns { missing: Vec<String> },

    /// The upload has no header or no data rows
    #[error("Uploaded CSV contains no data rows")]
    Empty,

    /// A date cell could not be coerced to a date/time
    #[error("Line {line}: could not parse date '{value}'")]
    InvalidDate { line: u64, value: String },

    /// A sales cell is neither empty nor a number
    #[error("Line {line}: sales value '{value}' is not a number")]
    InvalidSales { line: u64, value: String },

    /// The upload exceeds the configured size limit
    #[error("Upload of {size} bytes exceeds the limit of {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
