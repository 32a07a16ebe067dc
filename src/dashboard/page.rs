//! Dashboard Page
//!
//! The dashboard is a single server-rendered page. With no upload it shows
//! the file picker and a prompt; after an upload it shows the preview, the
//! forecast tail and both charts, or the error that stopped the pass.

use leptos::*;

use super::{Dashboard, Summary};
use crate::chart::PLOTLY_JS_URL;
use crate::dataset::format_timestamp;
use crate::forecast::ForecastRow;

pub const PAGE_TITLE: &str = "Sales Forecasting Dashboard";

pub const UPLOAD_PROMPT: &str = "Please upload a CSV file with 'date' and 'sales' columns.";

const FORECAST_COLUMNS: [&str; 4] = ["ds", "yhat", "yhat_lower", "yhat_upper"];

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0 auto; max-width: 1200px; padding: 1.5rem; color: #262730; }
h1 { margin-bottom: 0.25rem; }
section { margin-top: 2rem; }
table { border-collapse: collapse; font-size: 0.9rem; }
th, td { border: 1px solid #e6e9ef; padding: 0.3rem 0.7rem; text-align: right; }
th { background: #f0f2f6; }
.notice { padding: 0.8rem 1rem; border-radius: 0.4rem; margin-top: 1rem; }
.notice.warning { background: #fffce7; color: #926c05; }
.notice.error { background: #ffecec; color: #7d353b; }
.summary { color: #555; font-size: 0.9rem; }
form { margin-top: 1rem; padding: 1rem; border: 1px dashed #c0c4cc; border-radius: 0.4rem; }
"#;

/// How a notice is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Error,
}

impl NoticeKind {
    fn class(&self) -> &'static str {
        match self {
            NoticeKind::Warning => "notice warning",
            NoticeKind::Error => "notice error",
        }
    }
}

/// The page before anything is uploaded, optionally with a notice
pub fn render_upload_page(message: Option<(NoticeKind, &str)>) -> String {
    let (kind, message) = match message {
        Some((kind, text)) => (kind, text.to_string()),
        None => (NoticeKind::Warning, UPLOAD_PROMPT.to_string()),
    };

    render_document(false, move || {
        view! {
            <UploadForm/>
            <Notice kind=kind message=message/>
        }
    })
}

/// The page after a successful render pass
///
/// `with_form` keeps the file picker at the top (the server page); reports
/// written by the CLI leave it out.
pub fn render_dashboard_page(dashboard: &Dashboard, with_form: bool) -> String {
    let summary = summary_text(&dashboard.summary);
    let columns = dashboard.columns.clone();
    let preview = dashboard.preview.clone();
    let tail = dashboard.tail.clone();
    let forecast_chart = dashboard.forecast_chart.clone();
    let components_chart = dashboard.components_chart.clone();

    render_document(true, move || {
        view! {
            {with_form.then(|| view! { <UploadForm/> })}
            <p class="summary">{summary}</p>
            <PreviewTable columns=columns rows=preview/>
            <ForecastTable rows=tail/>
            <Charts forecast_chart=forecast_chart components_chart=components_chart/>
        }
    })
}

/// Wrap a page body in the shared document shell
fn render_document<F, N>(with_plotly: bool, body: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let html = leptos::ssr::render_to_string(move || {
        view! {
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <title>{PAGE_TITLE}</title>
                    <style inner_html=STYLE></style>
                    {with_plotly.then(|| view! { <script src=PLOTLY_JS_URL></script> })}
                </head>
                <body>
                    <h1>{PAGE_TITLE}</h1>
                    <p>"Upload your sales data and forecast the next 30 days with a Prophet model."</p>
                    {body()}
                </body>
            </html>
        }
    });

    format!("<!DOCTYPE html>\n{}", html)
}

fn summary_text(summary: &Summary) -> String {
    let range = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => {
            format!("{} to {}", format_timestamp(&first), format_timestamp(&last))
        }
        _ => "-".to_string(),
    };
    let forecast_end = summary
        .forecast_end
        .map(|d| format_timestamp(&d))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} rows ({} with sales) from {}; forecast through {} using {}.",
        summary.rows, summary.observed, range, forecast_end, summary.forecaster
    )
}

/// File picker posting the CSV back to `/`
#[component]
fn UploadForm() -> impl IntoView {
    view! {
        <form method="post" action="/" enctype="multipart/form-data">
            <label>
                "Upload your sales data (CSV format)"
                <br/>
                <input type="file" id="file" name="file" accept=".csv,text/csv" required=true/>
            </label>
            <button type="submit">"Forecast"</button>
        </form>
    }
}

/// Warning or error banner
#[component]
fn Notice(
    /// Banner style
    kind: NoticeKind,
    /// Text shown in the banner
    #[prop(into)]
    message: String,
) -> impl IntoView {
    view! {
        <div class={kind.class()} role="alert">{message}</div>
    }
}

/// Plain table of text cells
#[component]
fn DataTable(
    /// Header cells
    columns: Vec<String>,
    /// Body rows, one text cell per column
    rows: Vec<Vec<String>>,
) -> impl IntoView {
    view! {
        <table>
            <thead>
                <tr>
                    {columns.into_iter().map(|column| view! { <th>{column}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>
                {rows
                    .into_iter()
                    .map(|row| {
                        view! {
                            <tr>
                                {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

/// First rows of the sorted upload
#[component]
fn PreviewTable(
    /// Header of the uploaded table
    columns: Vec<String>,
    /// Leading rows, dates already coerced
    rows: Vec<Vec<String>>,
) -> impl IntoView {
    view! {
        <section>
            <h2>"Uploaded Data Preview"</h2>
            <DataTable columns=columns rows=rows/>
        </section>
    }
}

/// Last rows of the forecast table
#[component]
fn ForecastTable(
    /// Trailing forecast rows
    rows: Vec<ForecastRow>,
) -> impl IntoView {
    let columns: Vec<String> = FORECAST_COLUMNS.iter().map(|c| c.to_string()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                format_timestamp(&r.ds),
                format!("{:.6}", r.yhat),
                format!("{:.6}", r.yhat_lower),
                format!("{:.6}", r.yhat_upper),
            ]
        })
        .collect();

    view! {
        <section>
            <h2>"Forecasted Data"</h2>
            <DataTable columns=columns rows=cells/>
        </section>
    }
}

/// Interactive forecast chart and the static component chart
#[component]
fn Charts(
    /// Inline plotly.js fragment
    forecast_chart: String,
    /// Multi-panel component SVG
    components_chart: String,
) -> impl IntoView {
    view! {
        <section>
            <h2>"Forecast Visualization"</h2>
            <div class="chart" inner_html=forecast_chart></div>
        </section>
        <section>
            <h2>"Forecast Components"</h2>
            <div class="chart" inner_html=components_chart></div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_support::MeanForecaster;
    use crate::dashboard::DashboardSettings;
    use crate::dataset::parse_upload;

    fn sample_dashboard() -> Dashboard {
        let table = parse_upload(
            b"date,sales,note\n2024-01-02,5,<script>\n2024-01-01,4,ok\n2024-01-03,6,ok\n",
        )
        .unwrap();
        Dashboard::build(
            &table,
            &MeanForecaster::default(),
            &DashboardSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_upload_page_prompts() {
        let html = render_upload_page(None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"file\""));
        assert!(html.contains("notice warning"));
        assert!(html.contains("Please upload a CSV file with"));
        assert!(!html.contains(PLOTLY_JS_URL));
    }

    #[test]
    fn test_upload_page_error_notice() {
        let html = render_upload_page(Some((NoticeKind::Error, "Line 3: <bad> & worse")));

        assert!(html.contains("notice error"));
        assert!(html.contains("Line 3: &lt;bad&gt; &amp; worse"));
        assert!(!html.contains("Please upload a CSV file with"));
    }

    #[test]
    fn test_dashboard_page_sections() {
        let dashboard = sample_dashboard();

        let html = render_dashboard_page(&dashboard, false);

        for heading in [
            "Uploaded Data Preview",
            "Forecasted Data",
            "Forecast Visualization",
            "Forecast Components",
        ] {
            assert!(html.contains(heading), "missing section {heading}");
        }
        assert!(html.contains(PLOTLY_JS_URL));
        assert!(html.contains("yhat_lower"));
        assert!(html.contains("2024-02-02"));
        assert!(html.contains("3 rows (3 with sales)"));
        assert!(!html.contains("<form"));

        assert!(render_dashboard_page(&dashboard, true).contains("<form"));
    }

    #[test]
    fn test_cells_escaped_and_charts_embedded() {
        let dashboard = sample_dashboard();

        let html = render_dashboard_page(&dashboard, false);

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("forecast-chart"));
        assert!(html.contains("<svg"));
    }
}
