//! Dashboard error types

use thiserror::Error;

use crate::chart::ChartError;
use crate::forecast::ForecastError;

/// Errors raised after the upload was accepted
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Forecast failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Chart failed: {0}")]
    Chart(#[from] ChartError),
}

/// Result type for the render pass
pub type DashboardResult<T> = Result<T, DashboardError>;
