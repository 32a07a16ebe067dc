//! Forecast Routes
//!
//! JSON access to the render pass.
//!
//! - POST /api/v1/forecast - Raw CSV body in, forecast table out

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ForecastParams, ForecastResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::Dashboard;
use crate::dataset::{check_size, parse_upload};

/// POST /api/v1/forecast
///
/// The body is the CSV file itself. `?include_charts=true` adds the
/// rendered charts to the response.
pub async fn forecast_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastParams>,
    body: Bytes,
) -> ApiResult<Json<ForecastResponse>> {
    let dashboard = render_upload(&state, body).await?;
    Ok(Json(ForecastResponse::from_dashboard(
        dashboard,
        params.include_charts,
    )))
}

/// Validate an upload and run the render pass on the blocking pool
///
/// Validation failures return before the forecaster is touched.
pub async fn render_upload(state: &AppState, bytes: Bytes) -> ApiResult<Dashboard> {
    check_size(bytes.len(), state.config.max_upload_bytes)?;
    let table = parse_upload(&bytes)?;

    let forecaster = Arc::clone(&state.forecaster);
    let settings = state.settings;

    tokio::task::spawn_blocking(move || Dashboard::build(&table, forecaster.as_ref(), &settings))
        .await
        .map_err(|e| ApiError::Internal(format!("Forecast task failed: {}", e)))?
        .map_err(ApiError::from)
}
