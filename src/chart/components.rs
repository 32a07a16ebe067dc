//! Static component chart
//!
//! One SVG with a panel per forecast component: trend first, then each
//! seasonality. Weekly seasonality is drawn over a single week, Sunday to
//! Saturday; every other component is drawn over the forecast dates.

use chrono::{Datelike, Weekday};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::error::{ChartError, ChartResult};
use crate::dataset::format_timestamp;
use crate::forecast::{ComponentSeries, Forecast};

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const LINE_COLOR: RGBColor = RGBColor(0, 114, 178);

/// Data for a single panel
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    /// X axis labels, one per point
    pub labels: Vec<String>,
    pub point: Vec<f64>,
    pub band: Option<(Vec<f64>, Vec<f64>)>,
}

impl Panel {
    fn from_series(series: &ComponentSeries, labels: Vec<String>) -> Self {
        let band = match (&series.lower, &series.upper) {
            (Some(lower), Some(upper)) => Some((lower.clone(), upper.clone())),
            _ => None,
        };
        Self {
            title: series.name.clone(),
            labels,
            point: series.point.clone(),
            band,
        }
    }

    /// Min and max over the line and the band, padded so flat series
    /// still get a visible axis
    fn y_range(&self) -> (f64, f64) {
        let band_values = self
            .band
            .iter()
            .flat_map(|(lower, upper)| lower.iter().chain(upper.iter()));
        let (min, max) = self
            .point
            .iter()
            .chain(band_values)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        if !min.is_finite() || !max.is_finite() {
            return (-1.0, 1.0);
        }
        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        (min - pad, max + pad)
    }
}

/// Lay out the panels for a forecast
pub fn panels(forecast: &Forecast) -> Vec<Panel> {
    let dates: Vec<String> = forecast.rows.iter().map(|r| format_timestamp(&r.ds)).collect();

    let mut panels = vec![Panel::from_series(&forecast.components.trend, dates.clone())];

    for series in &forecast.components.seasonalities {
        if series.name == "weekly" {
            if let Some(panel) = weekly_panel(forecast, series) {
                panels.push(panel);
                continue;
            }
        }
        panels.push(Panel::from_series(series, dates.clone()));
    }

    panels
}

/// Collapse a weekly series to one value per weekday
///
/// Returns `None` when the forecast does not cover a full week.
fn weekly_panel(forecast: &Forecast, series: &ComponentSeries) -> Option<Panel> {
    let pick = |values: &[f64]| -> Option<Vec<f64>> {
        WEEK.iter()
            .map(|day| {
                forecast
                    .rows
                    .iter()
                    .position(|r| r.ds.weekday() == *day)
                    .and_then(|i| values.get(i).copied())
            })
            .collect()
    };

    let point = pick(series.point.as_slice())?;
    let band = match (&series.lower, &series.upper) {
        (Some(lower), Some(upper)) => pick(lower.as_slice()).zip(pick(upper.as_slice())),
        _ => None,
    };

    Some(Panel {
        title: series.name.clone(),
        labels: WEEK.iter().map(|d| weekday_name(*d).to_string()).collect(),
        point,
        band,
    })
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Render all component panels into one SVG document
pub fn components_svg(forecast: &Forecast, width: u32, panel_height: u32) -> ChartResult<String> {
    if forecast.is_empty() {
        return Err(ChartError::NoData);
    }

    let panels = panels(forecast);
    let height = panel_height * panels.len() as u32;
    let mut svg = String::new();

    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let areas = root.split_evenly((panels.len(), 1));
        for (panel, area) in panels.iter().zip(areas.iter()) {
            draw_panel(area, panel)?;
        }

        root.present().map_err(render_err)?;
    }

    tracing::debug!(panels = panels.len(), bytes = svg.len(), "Component chart rendered");
    Ok(svg)
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> ChartResult<()> {
    let n = panel.point.len();
    let x_max = n.saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = panel.y_range();
    let labels = &panel.labels;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(render_err)?;

    let label_at = |x: &f64| -> String {
        let idx = x.round();
        if idx < 0.0 || (idx - x).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(labels.len().clamp(2, 8))
        .x_label_formatter(&label_at)
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()
        .map_err(render_err)?;

    if let Some((lower, upper)) = &panel.band {
        let outline: Vec<(f64, f64)> = upper
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .chain(lower.iter().enumerate().rev().map(|(i, v)| (i as f64, *v)))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                LINE_COLOR.mix(0.2).filled(),
            )))
            .map_err(render_err)?;
    }

    chart
        .draw_series(LineSeries::new(
            panel.point.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            LINE_COLOR.stroke_width(2),
        ))
        .map_err(render_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::test_support::sample_forecast;
    use crate::forecast::Components;

    #[test]
    fn test_panels_trend_then_weekly_by_weekday() {
        let (_, forecast) = sample_forecast();

        let panels = panels(&forecast);

        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].title, "trend");
        assert_eq!(panels[0].labels.len(), forecast.len());
        assert!(panels[0].band.is_some());

        let weekly = &panels[1];
        assert_eq!(weekly.title, "weekly");
        assert_eq!(weekly.labels.first().map(String::as_str), Some("Sunday"));
        assert_eq!(weekly.labels.last().map(String::as_str), Some("Saturday"));
        assert_eq!(weekly.point.len(), 7);
    }

    #[test]
    fn test_weekly_values_follow_weekday() {
        let (_, forecast) = sample_forecast();

        let panels = panels(&forecast);

        // sample weekly effect is the weekday number from Monday
        let expected: Vec<f64> = WEEK
            .iter()
            .map(|d| d.num_days_from_monday() as f64)
            .collect();
        assert_eq!(panels[1].point, expected);
    }

    #[test]
    fn test_flat_series_gets_padded_range() {
        let panel = Panel {
            title: "trend".into(),
            labels: vec!["a".into(), "b".into()],
            point: vec![3.0, 3.0],
            band: None,
        };
        assert_eq!(panel.y_range(), (2.0, 4.0));
    }

    #[test]
    fn test_components_svg() {
        let (_, forecast) = sample_forecast();

        let svg = components_svg(&forecast, 600, 200).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("trend"));
        assert!(svg.contains("weekly"));
        assert!(svg.contains("Sunday"));
    }

    #[test]
    fn test_components_svg_empty_forecast() {
        let forecast = Forecast {
            rows: vec![],
            components: Components {
                trend: ComponentSeries::new("trend", vec![]),
                seasonalities: vec![],
            },
        };
        assert!(matches!(
            components_svg(&forecast, 600, 200),
            Err(ChartError::NoData)
        ));
    }
}
