//! Prophet forecasting backend
//!
//! Delegates fitting and prediction to the Prophet model from `augurs`,
//! with the Stan optimizer compiled to WebAssembly so no external toolchain
//! is needed at runtime.

use augurs::prophet::{
    wasmstan::WasmstanOptimizer, PredictionData, Prophet, ProphetOptions, TrainingData,
};
use chrono::NaiveDateTime;
use std::time::Instant;

use super::error::{ForecastError, ForecastResult};
use super::types::{ComponentSeries, Components, Forecast, ForecastRow, Horizon};
use super::Forecaster;
use crate::config::ForecastConfig;
use crate::dataset::History;

/// Prophet needs two non-missing values to fit
const MIN_OBSERVATIONS: usize = 2;

/// Forecaster backed by the `augurs` Prophet model
#[derive(Debug, Clone)]
pub struct ProphetForecaster {
    /// Width of the uncertainty interval (0.8 = 80%)
    interval_width: f64,
    /// Number of simulated draws used to estimate intervals
    uncertainty_samples: u32,
}

impl Default for ProphetForecaster {
    fn default() -> Self {
        Self {
            interval_width: 0.8,
            uncertainty_samples: 1000,
        }
    }
}

impl ProphetForecaster {
    pub fn new(interval_width: f64, uncertainty_samples: u32) -> Self {
        Self {
            interval_width,
            uncertainty_samples,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.interval_width, config.uncertainty_samples)
    }

    fn options(&self) -> ForecastResult<ProphetOptions> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::Model(format!(
                "interval width must be between 0 and 1, got {}",
                self.interval_width
            )));
        }

        let mut options = ProphetOptions::default();
        options.interval_width = self.interval_width.try_into().map_err(|e| {
            ForecastError::Model(format!(
                "invalid interval width {}: {:?}",
                self.interval_width, e
            ))
        })?;
        options.uncertainty_samples = self.uncertainty_samples;
        Ok(options)
    }
}

impl Forecaster for ProphetForecaster {
    fn name(&self) -> &str {
        "prophet"
    }

    fn forecast(&self, history: &History, horizon: Horizon) -> ForecastResult<Forecast> {
        let (ds, y): (Vec<i64>, Vec<f64>) = history
            .observed()
            .map(|(ds, y)| (to_seconds(ds), y))
            .unzip();

        if y.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: y.len(),
            });
        }

        let dates = horizon.future_dates(history);
        let started = Instant::now();

        let training = TrainingData::new(ds, y)
            .map_err(|e| ForecastError::Model(format!("invalid training data: {}", e)))?;

        let mut model = Prophet::new(self.options()?, WasmstanOptimizer::new());
        model
            .fit(training, Default::default())
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        tracing::debug!(
            observations = history.observed_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prophet model fitted"
        );

        let frame = PredictionData::new(dates.iter().map(|d| to_seconds(*d)).collect());
        let predictions = model
            .predict(Some(frame))
            .map_err(|e| ForecastError::Prediction(e.to_string()))?;

        let n = dates.len();
        let yhat = &predictions.yhat;
        if yhat.point.len() != n {
            return Err(ForecastError::Prediction(format!(
                "expected {} predicted rows, got {}",
                n,
                yhat.point.len()
            )));
        }

        let lower = yhat.lower.as_deref().unwrap_or(&yhat.point);
        let upper = yhat.upper.as_deref().unwrap_or(&yhat.point);

        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, ds)| ForecastRow {
                ds: *ds,
                yhat: yhat.point[i],
                yhat_lower: lower[i],
                yhat_upper: upper[i],
            })
            .collect();

        let trend = component(
            "trend",
            &predictions.trend.point,
            predictions.trend.lower.as_ref(),
            predictions.trend.upper.as_ref(),
        );

        let mut seasonalities: Vec<ComponentSeries> = predictions
            .seasonalities
            .iter()
            .map(|(name, feature)| {
                component(
                    name,
                    &feature.point,
                    feature.lower.as_ref(),
                    feature.upper.as_ref(),
                )
            })
            .collect();
        seasonalities.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!(
            rows = n,
            seasonalities = seasonalities.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prophet forecast complete"
        );

        Ok(Forecast {
            rows,
            components: Components {
                trend,
                seasonalities,
            },
        })
    }
}

fn component(
    name: &str,
    point: &[f64],
    lower: Option<&Vec<f64>>,
    upper: Option<&Vec<f64>>,
) -> ComponentSeries {
    let series = ComponentSeries::new(name, point.to_vec());
    match (lower, upper) {
        (Some(l), Some(u)) => series.bounds(l.clone(), u.clone()),
        _ => series,
    }
}

/// Seconds since the Unix epoch, treating naive timestamps as UTC
fn to_seconds(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_upload;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_seconds_conversion() {
        let ts = ymd(2024, 1, 1);
        assert_eq!(to_seconds(ts), 1_704_067_200);
        assert_eq!(to_seconds(ymd(2024, 1, 2)) - to_seconds(ts), 86_400);
    }

    #[test]
    fn test_insufficient_data() {
        let table = parse_upload(b"date,sales\n2024-01-01,100\n2024-01-02,\n").unwrap();

        let err = ProphetForecaster::default()
            .forecast(&table.to_history(), Horizon::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_invalid_interval_width() {
        let table = parse_upload(b"date,sales\n2024-01-01,1\n2024-01-02,2\n").unwrap();

        let result =
            ProphetForecaster::new(1.5, 100).forecast(&table.to_history(), Horizon::default());

        assert!(matches!(result, Err(ForecastError::Model(_))));
    }

    #[test]
    fn test_prophet_forecast_ten_days() {
        let mut csv_data = String::from("date,sales\n");
        for d in (1..=10).rev() {
            csv_data.push_str(&format!("2024-01-{:02},{}\n", d, 99 + d));
        }
        let table = parse_upload(csv_data.as_bytes()).unwrap();

        let forecast = ProphetForecaster::default()
            .forecast(&table.to_history(), Horizon::default())
            .unwrap();

        assert_eq!(forecast.len(), 40);
        assert_eq!(forecast.rows[0].ds, ymd(2024, 1, 1));
        assert_eq!(forecast.last_date(), Some(ymd(2024, 2, 9)));
        assert_eq!(forecast.components.trend.point.len(), 40);

        for row in &forecast.rows {
            assert!(row.yhat.is_finite());
            assert!(
                row.yhat_lower <= row.yhat + 1e-6 && row.yhat <= row.yhat_upper + 1e-6,
                "interval out of order at {}: {} <= {} <= {}",
                row.ds,
                row.yhat_lower,
                row.yhat,
                row.yhat_upper
            );
        }
    }
}
