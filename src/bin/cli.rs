//! Salescast CLI
//!
//! Command-line interface for Salescast operations:
//! - Forecast a local CSV file
//! - Generate a default config file

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use salescast::api::dto::ForecastResponse;
use salescast::config::{generate_default_config, Config};
use salescast::dashboard::page::render_dashboard_page;
use salescast::dashboard::{Dashboard, DashboardSettings};
use salescast::dataset::{format_timestamp, parse_upload_file};
use salescast::forecast::ProphetForecaster;

#[derive(Parser)]
#[command(name = "salescast-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Forecast daily sales from a CSV file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for printed results (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast the next 30 days of a sales CSV
    Forecast {
        /// CSV file with `date` and `sales` columns
        path: PathBuf,
        /// Write an HTML report here instead of printing tables
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows of the uploaded table to show
        #[arg(long)]
        preview_rows: Option<usize>,
        /// Rows of the forecast table to show
        #[arg(long)]
        tail_rows: Option<usize>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Forecast {
            path,
            output,
            preview_rows,
            tail_rows,
        } => {
            let config = match &cli.config {
                Some(config_path) => Config::load_with_env(config_path)
                    .with_context(|| format!("loading config from {}", config_path.display()))?,
                None => Config::from_env(),
            };
            salescast::logging::init(&config.logging);

            let mut settings = DashboardSettings::from_config(&config);
            if let Some(n) = preview_rows {
                settings.preview_rows = n;
            }
            if let Some(n) = tail_rows {
                settings.tail_rows = n;
            }

            let table = parse_upload_file(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let forecaster = ProphetForecaster::from_config(&config.forecast);
            let dashboard = Dashboard::build(&table, &forecaster, &settings)?;

            match output {
                Some(report) => {
                    std::fs::write(&report, render_dashboard_page(&dashboard, false))
                        .with_context(|| format!("writing {}", report.display()))?;
                    println!(
                        "Forecast through {} written to {}",
                        dashboard
                            .summary
                            .forecast_end
                            .map(|ds| format_timestamp(&ds))
                            .unwrap_or_else(|| "-".to_string()),
                        report.display()
                    );
                }
                None if cli.format == "json" => {
                    let response = ForecastResponse::from_dashboard(dashboard, false);
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                None => print_tables(&dashboard),
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn print_tables(dashboard: &Dashboard) {
    println!("Uploaded Data Preview:");
    println!("{}", dashboard.columns.join("\t"));
    for row in &dashboard.preview {
        println!("{}", row.join("\t"));
    }

    println!();
    println!("Forecasted Data:");
    println!("{:<20} {:>14} {:>14} {:>14}", "ds", "yhat", "yhat_lower", "yhat_upper");
    for row in &dashboard.tail {
        println!(
            "{:<20} {:>14.6} {:>14.6} {:>14.6}",
            format_timestamp(&row.ds),
            row.yhat,
            row.yhat_lower,
            row.yhat_upper
        );
    }

    let summary = &dashboard.summary;
    println!();
    println!(
        "{} rows, {} observed, {}-day horizon, {} in {} ms",
        summary.rows, summary.observed, summary.horizon_days, summary.forecaster, summary.elapsed_ms
    );
}
