//! Forecast data types
//!
//! - `Horizon`: how far past the last observation to predict
//! - `Forecast`: the forecast table plus its component decomposition

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::dataset::History;

/// Number of daily periods predicted past the last observed date
pub const FORECAST_HORIZON_DAYS: u32 = 30;

/// Forecast horizon in daily periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    periods: u32,
}

impl Horizon {
    pub fn days(periods: u32) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// Dates a forecast is produced for
    ///
    /// Every distinct history date, then `periods` consecutive days after the
    /// latest one. Empty when the history is empty.
    pub fn future_dates(&self, history: &History) -> Vec<NaiveDateTime> {
        let mut dates = history.unique_dates();
        let Some(last) = dates.last().copied() else {
            return dates;
        };

        dates.extend((1..=i64::from(self.periods)).map(|i| last + Duration::days(i)));
        dates
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::days(FORECAST_HORIZON_DAYS)
    }
}

/// One row of the forecast table
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ForecastRow {
    pub ds: NaiveDateTime,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastRow {
    /// True when the point estimate lies within its interval
    pub fn is_within_interval(&self) -> bool {
        self.yhat_lower <= self.yhat && self.yhat <= self.yhat_upper
    }
}

/// One additive component of a forecast, aligned with the forecast rows
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentSeries {
    pub name: String,
    pub point: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<f64>>,
}

impl ComponentSeries {
    pub fn new(name: impl Into<String>, point: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            point,
            lower: None,
            upper: None,
        }
    }

    /// Builder method: attach uncertainty bounds
    pub fn bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }
}

/// Trend and seasonal effects behind a forecast
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Components {
    pub trend: ComponentSeries,
    /// Seasonal effects sorted by name (e.g. `weekly`, `yearly`)
    pub seasonalities: Vec<ComponentSeries>,
}

/// The forecast table: history dates followed by the horizon
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub rows: Vec<ForecastRow>,
    pub components: Components,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last `n` rows of the table
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    pub fn last_date(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.ds)
    }
}
