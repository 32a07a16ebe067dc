//! Charts
//!
//! Rendering is delegated to charting libraries:
//!
//! - **interactive**: forecast figure for plotly.js (`plotly`)
//! - **components**: multi-panel trend/seasonality SVG (`plotters`)

mod components;
mod error;
mod interactive;

pub use components::{components_svg, panels, Panel};
pub use error::{ChartError, ChartResult};
pub use interactive::{forecast_figure, forecast_plot, PLOTLY_JS_URL};
