//! Data Transfer Objects
//!
//! Request and response types for the JSON endpoints.

use serde::{Deserialize, Serialize};

use crate::dashboard::{Dashboard, Summary};
use crate::forecast::{Components, ForecastRow};

// ============================================
// FORECAST DTOs
// ============================================

/// Query parameters for `POST /api/v1/forecast`
#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    /// Include the rendered charts in the response
    #[serde(default)]
    pub include_charts: bool,
}

/// Rendered charts, returned on request
#[derive(Debug, Serialize)]
pub struct ChartsDto {
    /// Inline plotly.js fragment
    pub forecast: String,
    /// Multi-panel component SVG
    pub components: String,
}

/// Forecast response
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub summary: Summary,
    /// Header of the uploaded table
    pub columns: Vec<String>,
    /// First rows of the sorted upload
    pub preview: Vec<Vec<String>>,
    /// Last rows of the forecast table
    pub tail: Vec<ForecastRow>,
    /// Every row of the forecast table
    pub forecast: Vec<ForecastRow>,
    pub components: Components,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartsDto>,
}

impl ForecastResponse {
    pub fn from_dashboard(dashboard: Dashboard, include_charts: bool) -> Self {
        let charts = include_charts.then(|| ChartsDto {
            forecast: dashboard.forecast_chart,
            components: dashboard.components_chart,
        });

        Self {
            summary: dashboard.summary,
            columns: dashboard.columns,
            preview: dashboard.preview,
            tail: dashboard.tail,
            forecast: dashboard.forecast.rows,
            components: dashboard.forecast.components,
            charts,
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Name of the forecasting backend
    pub forecaster: String,
    /// Forecast horizon in days
    pub horizon_days: u32,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
