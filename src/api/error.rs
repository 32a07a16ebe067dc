//! API Error Types
//!
//! Defines error types for the server and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::dashboard::DashboardError;
use crate::dataset::DatasetError;
use crate::forecast::ForecastError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// The upload was rejected
    #[error("{0}")]
    Dataset(#[from] DatasetError),

    /// Forecasting or charting failed after the upload was accepted
    #[error("{0}")]
    Dashboard(#[from] DashboardError),

    /// Malformed request (missing form field, unreadable multipart body)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Dataset(e) => match e {
                DatasetError::MissingColumns { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_COLUMNS")
                }
                DatasetError::Empty => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_UPLOAD"),
                DatasetError::InvalidDate { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_DATE")
                }
                DatasetError::InvalidSales { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SALES")
                }
                DatasetError::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "UPLOAD_TOO_LARGE"),
                DatasetError::Csv(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CSV"),
                DatasetError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            },
            ApiError::Dashboard(DashboardError::Forecast(ForecastError::InsufficientData {
                ..
            })) => (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_DATA"),
            ApiError::Dashboard(DashboardError::Forecast(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "FORECAST_ERROR")
            }
            ApiError::Dashboard(DashboardError::Chart(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CHART_ERROR")
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    /// Structured details for the error body, when there are any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Dataset(DatasetError::MissingColumns { missing }) => {
                Some(serde_json::json!({ "missing": missing }))
            }
            ApiError::Dataset(DatasetError::InvalidDate { line, value })
            | ApiError::Dataset(DatasetError::InvalidSales { line, value }) => {
                Some(serde_json::json!({ "line": line, "value": value }))
            }
            ApiError::Dataset(DatasetError::TooLarge { size, limit }) => {
                Some(serde_json::json!({ "size": size, "limit": limit }))
            }
            _ => None,
        }
    }

    /// Log the error, returning the request id it was logged under
    pub fn log(&self) -> String {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        request_id
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = self.log();

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_maps_to_422() {
        let err = ApiError::from(DatasetError::MissingColumns {
            missing: vec!["date".to_string()],
        });

        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_COLUMNS")
        );
        assert_eq!(err.to_string(), "CSV must contain 'date' and 'sales' columns.");
        assert_eq!(err.details(), Some(serde_json::json!({ "missing": ["date"] })));
    }

    #[test]
    fn test_forecast_errors() {
        let err = ApiError::from(DashboardError::from(ForecastError::InsufficientData {
            required: 2,
            actual: 0,
        }));
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(DashboardError::from(ForecastError::Model("boom".into())));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_too_large() {
        let err = ApiError::from(DatasetError::TooLarge { size: 20, limit: 10 });
        assert_eq!(err.status_and_code().0, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
