//! # Salescast
//!
//! Sales forecasting dashboard - upload a CSV of daily sales, get a 30-day
//! forecast with uncertainty bounds and a breakdown of its components.
//!
//! ## Features
//!
//! - **Validated uploads**: `date` and `sales` columns are required, dates are
//!   coerced and the table is sorted before anything else happens
//! - **Prophet forecasting**: trend plus seasonality via `augurs`
//! - **Charts**: an interactive plotly chart and a static SVG component chart
//! - **Two surfaces**: an Axum dashboard server and a local CLI
//!
//! ## Modules
//!
//! - [`dataset`]: CSV upload validation and the (ds, y) history
//! - [`forecast`]: Forecasting backends and the forecast table
//! - [`chart`]: Interactive and component charts
//! - [`dashboard`]: The render pass and the HTML page
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salescast::dashboard::{Dashboard, DashboardSettings};
//! use salescast::dataset::parse_upload;
//! use salescast::forecast::ProphetForecaster;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = parse_upload(b"date,sales\n2024-01-01,10\n2024-01-02,12\n2024-01-03,11\n")?;
//!
//!     let dashboard = Dashboard::build(
//!         &table,
//!         &ProphetForecaster::default(),
//!         &DashboardSettings::default(),
//!     )?;
//!
//!     for row in &dashboard.tail {
//!         println!("{} {:.2} [{:.2}, {:.2}]", row.ds, row.yhat, row.yhat_lower, row.yhat_upper);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod forecast;
pub mod logging;
