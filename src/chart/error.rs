//! Chart error types

use thiserror::Error;

/// Errors that can occur while rendering charts
#[derive(Error, Debug)]
pub enum ChartError {
    /// Nothing to plot
    #[error("Forecast has no rows to chart")]
    NoData,

    /// The drawing backend failed
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
