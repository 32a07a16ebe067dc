//! Forecast error types

use thiserror::Error;

/// Errors that can occur while fitting or predicting
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Not enough observed values to fit a model
    #[error("Need at least {required} observed sales values to forecast, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Model configuration or fitting failed
    #[error("Model error: {0}")]
    Model(String),

    /// Prediction failed or returned an unexpected shape
    #[error("Prediction error: {0}")]
    Prediction(String),
}

/// Result type for forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Need at least 2 observed sales values to forecast, got 1"
        );
    }
}
