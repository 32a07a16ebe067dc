//! Interactive forecast chart
//!
//! A plotly.js figure emitted as an inline HTML fragment. The page that
//! embeds it must load plotly.js (see [`PLOTLY_JS_URL`]).

use plotly::common::{Fill, Line, Marker, Mode, Title};
use plotly::layout::{Axis, HoverMode, Layout};
use plotly::{Plot, Scatter};

use crate::dataset::{format_timestamp, History};
use crate::forecast::Forecast;

/// plotly.js bundle the inline figure expects
pub const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const FORECAST_COLOR: &str = "#0072B2";
const BAND_COLOR: &str = "rgba(0, 114, 178, 0.2)";
const ACTUAL_COLOR: &str = "#000000";

/// Build the forecast figure: observed points, `yhat` line and the
/// shaded `yhat_lower`..`yhat_upper` band
pub fn forecast_figure(history: &History, forecast: &Forecast) -> Plot {
    let x: Vec<String> = forecast.rows.iter().map(|r| format_timestamp(&r.ds)).collect();
    let upper: Vec<f64> = forecast.rows.iter().map(|r| r.yhat_upper).collect();
    let lower: Vec<f64> = forecast.rows.iter().map(|r| r.yhat_lower).collect();
    let yhat: Vec<f64> = forecast.rows.iter().map(|r| r.yhat).collect();

    let (actual_x, actual_y): (Vec<String>, Vec<f64>) = history
        .observed()
        .map(|(ds, y)| (format_timestamp(&ds), y))
        .unzip();

    // The band is drawn as the upper edge followed by the lower edge filled
    // up to it
    let upper_trace = Scatter::new(x.clone(), upper)
        .name("Upper bound")
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .show_legend(false);

    let lower_trace = Scatter::new(x.clone(), lower)
        .name("Lower bound")
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .fill(Fill::ToNextY)
        .fill_color(BAND_COLOR)
        .show_legend(false);

    let yhat_trace = Scatter::new(x, yhat)
        .name("Predicted")
        .mode(Mode::Lines)
        .line(Line::new().color(FORECAST_COLOR).width(2.0));

    let actual_trace = Scatter::new(actual_x, actual_y)
        .name("Actual")
        .mode(Mode::Markers)
        .marker(Marker::new().color(ACTUAL_COLOR).size(4));

    let layout = Layout::new()
        .hover_mode(HoverMode::XUnified)
        .x_axis(Axis::new().title(Title::with_text("ds")))
        .y_axis(Axis::new().title(Title::with_text("y")));

    let mut plot = Plot::new();
    plot.add_trace(upper_trace);
    plot.add_trace(lower_trace);
    plot.add_trace(yhat_trace);
    plot.add_trace(actual_trace);
    plot.set_layout(layout);
    plot
}

/// Render the forecast figure as an inline `<div>` + `<script>` fragment
pub fn forecast_plot(history: &History, forecast: &Forecast, div_id: &str) -> String {
    forecast_figure(history, forecast).to_inline_html(Some(div_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::test_support::sample_forecast;

    #[test]
    fn test_inline_html_targets_div() {
        let (history, forecast) = sample_forecast();

        let html = forecast_plot(&history, &forecast, "forecast-chart");

        assert!(html.contains("forecast-chart"));
        assert!(html.contains("Predicted"));
        assert!(html.contains("Actual"));
        assert!(html.contains("2024-02-13"));
    }

    #[test]
    fn test_figure_has_four_traces() {
        let (history, forecast) = sample_forecast();

        let json = forecast_figure(&history, &forecast).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["data"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["data"][1]["fill"], "tonexty");
    }

    #[test]
    fn test_axis_titles() {
        let (history, forecast) = sample_forecast();

        let json = forecast_figure(&history, &forecast).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["layout"]["xaxis"]["title"]["text"], "ds");
        assert_eq!(value["layout"]["yaxis"]["title"]["text"], "y");
    }
}
