//! Forecasting
//!
//! Fitting and prediction are delegated to an external model behind the
//! [`Forecaster`] trait. This module only decides *which dates* to predict
//! and maps the model output into a forecast table.
//!
//! - [`ProphetForecaster`]: production backend (`augurs` Prophet)
//! - [`Horizon`]: history dates plus 30 daily periods

mod error;
mod prophet;
mod types;

pub use error::{ForecastError, ForecastResult};
pub use prophet::ProphetForecaster;
pub use types::{
    ComponentSeries, Components, Forecast, ForecastRow, Horizon, FORECAST_HORIZON_DAYS,
};

use crate::dataset::History;

/// Common trait for all forecasting backends
///
/// Implementations are synchronous and may be CPU-heavy; async callers run
/// them on the blocking pool.
pub trait Forecaster: Send + Sync {
    /// Short backend name, reported by the health endpoint
    fn name(&self) -> &str;

    /// Fit on `history` and predict every date of `horizon.future_dates(history)`
    fn forecast(&self, history: &History, horizon: Horizon) -> ForecastResult<Forecast>;
}
