//! Dashboard Render Pass
//!
//! One pass turns a validated [`SalesTable`] into everything the page shows:
//!
//! ```text
//! SalesTable → preview (head)
//!            → History (ds, y) → Forecaster (30 days) → Forecast
//!                                                     → tail
//!                                                     → interactive chart
//!                                                     → component chart
//! ```
//!
//! Nothing survives the pass; each upload builds a new [`Dashboard`].

mod error;
pub mod page;

pub use error::{DashboardError, DashboardResult};

use chrono::NaiveDateTime;
use serde::Serialize;
use std::time::Instant;

use crate::chart::{components_svg, forecast_plot};
use crate::config::Config;
use crate::dataset::{History, SalesTable};
use crate::forecast::{Forecast, ForecastRow, Forecaster, Horizon};

/// Element id of the interactive chart container
pub const FORECAST_CHART_ID: &str = "forecast-chart";

/// Knobs for one render pass
#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub preview_rows: usize,
    pub tail_rows: usize,
    pub chart_width: u32,
    pub panel_height: u32,
    pub horizon: Horizon,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            tail_rows: 5,
            chart_width: 900,
            panel_height: 300,
            horizon: Horizon::default(),
        }
    }
}

impl DashboardSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            preview_rows: config.dashboard.preview_rows,
            tail_rows: config.dashboard.tail_rows,
            chart_width: config.dashboard.chart_width,
            panel_height: config.dashboard.panel_height,
            horizon: Horizon::default(),
        }
    }
}

/// Headline numbers shown above the tables
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Rows in the upload
    pub rows: usize,
    /// Rows with a sales value
    pub observed: usize,
    pub first_date: Option<NaiveDateTime>,
    pub last_date: Option<NaiveDateTime>,
    pub forecast_end: Option<NaiveDateTime>,
    pub horizon_days: u32,
    pub forecaster: String,
    pub elapsed_ms: u64,
}

/// The output of one render pass
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Header of the uploaded table
    pub columns: Vec<String>,
    /// First rows of the sorted upload
    pub preview: Vec<Vec<String>>,
    pub history: History,
    pub forecast: Forecast,
    /// Last rows of the forecast table
    pub tail: Vec<ForecastRow>,
    /// Inline plotly.js fragment
    #[serde(skip)]
    pub forecast_chart: String,
    /// Multi-panel component SVG
    #[serde(skip)]
    pub components_chart: String,
    pub summary: Summary,
}

impl Dashboard {
    /// Run the render pass
    pub fn build(
        table: &SalesTable,
        forecaster: &dyn Forecaster,
        settings: &DashboardSettings,
    ) -> DashboardResult<Self> {
        let started = Instant::now();

        let preview = table.preview(settings.preview_rows);
        let history = table.to_history();

        tracing::info!(
            rows = history.len(),
            observed = history.observed_count(),
            first = ?history.first_date(),
            last = ?history.last_date(),
            forecaster = forecaster.name(),
            "Forecasting uploaded sales"
        );

        let forecast = forecaster.forecast(&history, settings.horizon)?;
        let tail = forecast.tail(settings.tail_rows).to_vec();

        let forecast_chart = forecast_plot(&history, &forecast, FORECAST_CHART_ID);
        let components_chart =
            components_svg(&forecast, settings.chart_width, settings.panel_height)?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let summary = Summary {
            rows: history.len(),
            observed: history.observed_count(),
            first_date: history.first_date(),
            last_date: history.last_date(),
            forecast_end: forecast.last_date(),
            horizon_days: settings.horizon.periods(),
            forecaster: forecaster.name().to_string(),
            elapsed_ms,
        };

        tracing::info!(
            forecast_rows = forecast.len(),
            forecast_end = ?summary.forecast_end,
            elapsed_ms,
            "Dashboard rendered"
        );

        Ok(Self {
            columns: table.headers().to_vec(),
            preview,
            history,
            forecast,
            tail,
            forecast_chart,
            components_chart,
            summary,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::MeanForecaster;
    use super::*;
    use crate::dataset::parse_upload;
    use chrono::NaiveDate;

    fn january_upload() -> SalesTable {
        // Rows deliberately out of order
        let mut csv_data = String::from("date,sales,store\n");
        for d in (1..=10).rev() {
            csv_data.push_str(&format!("2024-01-{:02},{},main\n", d, 99 + d));
        }
        parse_upload(csv_data.as_bytes()).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_build_dashboard() {
        let forecaster = MeanForecaster::default();

        let dashboard =
            Dashboard::build(&january_upload(), &forecaster, &DashboardSettings::default())
                .unwrap();

        assert_eq!(forecaster.calls(), 1);
        assert_eq!(dashboard.columns, vec!["date", "sales", "store"]);

        // Preview: first five rows sorted ascending
        assert_eq!(dashboard.preview.len(), 5);
        assert_eq!(dashboard.preview[0], vec!["2024-01-01", "100", "main"]);
        assert_eq!(dashboard.preview[4], vec!["2024-01-05", "104", "main"]);

        // Forecast covers history plus 30 days
        assert_eq!(dashboard.forecast.len(), 40);
        assert_eq!(dashboard.summary.forecast_end, Some(ymd(2024, 2, 9)));
        assert_eq!(dashboard.summary.last_date, Some(ymd(2024, 1, 10)));
        assert_eq!(dashboard.summary.horizon_days, 30);
        assert_eq!(dashboard.summary.forecaster, "mean");

        assert_eq!(dashboard.tail.len(), 5);
        assert_eq!(dashboard.tail[4].ds, ymd(2024, 2, 9));
        assert!(dashboard.tail.iter().all(ForecastRow::is_within_interval));

        assert!(dashboard.forecast_chart.contains(FORECAST_CHART_ID));
        assert!(dashboard.components_chart.contains("<svg"));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.dashboard.preview_rows = 2;
        config.dashboard.tail_rows = 3;

        let settings = DashboardSettings::from_config(&config);
        let dashboard =
            Dashboard::build(&january_upload(), &MeanForecaster::default(), &settings).unwrap();

        assert_eq!(dashboard.preview.len(), 2);
        assert_eq!(dashboard.tail.len(), 3);
        assert_eq!(settings.horizon.periods(), 30);
    }

    #[test]
    fn test_forecast_error_propagates() {
        let table = parse_upload(b"date,sales\n2024-01-01,\n").unwrap();

        let err = Dashboard::build(&table, &MeanForecaster::default(), &DashboardSettings::default())
            .unwrap_err();

        assert!(matches!(err, DashboardError::Forecast(_)));
    }
}
